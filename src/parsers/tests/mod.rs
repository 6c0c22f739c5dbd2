mod integration_tests;
mod normalizer_tests;
