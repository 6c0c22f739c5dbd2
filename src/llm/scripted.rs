//! Backend double that replays canned completions and records every call

use crate::config::ModelConfig;
use crate::error::InferenceError;
use crate::llm::{CompletionRequest, InferenceContext, ModelBackend};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load,
    Complete(CompletionRequest),
    Reset,
    Close,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<String, String>>,
    calls: Vec<Call>,
    fail_load: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
}

pub struct ScriptedContext {
    script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn respond(self, text: &str) -> Self {
        self.script
            .borrow_mut()
            .responses
            .push_back(Ok(text.to_string()));
        self
    }

    /// Queue a failing completion
    pub fn fail(self, message: &str) -> Self {
        self.script
            .borrow_mut()
            .responses
            .push_back(Err(message.to_string()));
        self
    }

    /// Make every load fail
    pub fn failing_load(self) -> Self {
        self.script.borrow_mut().fail_load = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.borrow().calls.clone()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Complete(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: fn(&Call) -> bool) -> usize {
        self.script.borrow().calls.iter().filter(|c| wanted(c)).count()
    }
}

impl ModelBackend for ScriptedBackend {
    type Context = ScriptedContext;

    fn load(&self, _config: &ModelConfig) -> Result<ScriptedContext, InferenceError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call::Load);
        if script.fail_load {
            return Err(InferenceError::Backend("model failed to load".to_string()));
        }
        Ok(ScriptedContext {
            script: Rc::clone(&self.script),
        })
    }
}

impl InferenceContext for ScriptedContext {
    fn complete(&mut self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call::Complete(request.clone()));
        match script.responses.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(InferenceError::Backend(message)),
            None => Err(InferenceError::Backend("no scripted response left".to_string())),
        }
    }

    fn reset(&mut self) -> Result<(), InferenceError> {
        self.script.borrow_mut().calls.push(Call::Reset);
        Ok(())
    }

    fn close(self) -> Result<(), InferenceError> {
        self.script.borrow_mut().calls.push(Call::Close);
        Ok(())
    }
}
