pub mod formatting;
pub mod prompts;
pub mod table_renderer;
pub mod test_mode;
