use crate::transpiler::traits::SqlGenerator;

/// ANSI SQL; every hook keeps its default.
pub struct StandardGenerator;

impl SqlGenerator for StandardGenerator {
    fn name(&self) -> &'static str {
        "standard"
    }
}
