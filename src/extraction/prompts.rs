/// Marks the start of the instruction segment
pub const QUESTION_MARKER: &str = "<QUESTION>";
/// Marks the start of the page content segment
pub const CONTENT_MARKER: &str = "<CONTENT INFORMATION>";

const ROLE: &str = "You are an expert in analyzing product reviews.";

fn framed(question: &str, text: &str) -> String {
    format!(
        "{}: {}\n{}: <<\n{}\n>>",
        QUESTION_MARKER, question, CONTENT_MARKER, text
    )
}

pub fn rating(product: &str, text: &str) -> String {
    let question = format!(
        "{} Extract only the rating of '{}' from the content below. \
         If the rating is missing or does not belong to this product, answer 'no data'. \
         If a rating is found, answer in the format 'Rating: X.X'. \
         Be concise and specific. Don't add explanations.",
        ROLE, product
    );
    framed(&question, text)
}

pub fn pros(product: &str, text: &str) -> String {
    let question = format!(
        "{} Extract only the PROS (advantages) of '{}' from the content below, one per line. \
         If the needed information is missing or does not belong to this product, answer 'no data'. \
         Be concise and specific. Don't add explanations.",
        ROLE, product
    );
    framed(&question, text)
}

pub fn cons(product: &str, text: &str) -> String {
    let question = format!(
        "{} Extract only the CONS (disadvantages) of '{}' from the content below, one per line. \
         If the needed information is missing or does not belong to this product, answer 'no data'. \
         Be concise and specific. Don't add explanations.",
        ROLE, product
    );
    framed(&question, text)
}

/// Free-text prompt asking for the closing summary of all sources
pub fn conclusion(product: &str, rating_text: &str, pros: &[String], cons: &[String]) -> String {
    let mut prompt = format!(
        "Based on the following product analysis for '{}', write a 3-4 sentence conclusion.\n\
         Average Rating: {}\n",
        product, rating_text
    );

    prompt.push_str("Pros:\n");
    for pro in pros {
        prompt.push_str(&format!("- {}\n", pro));
    }

    prompt.push_str("Cons:\n");
    for con in cons {
        prompt.push_str(&format!("- {}\n", con));
    }

    prompt
}
