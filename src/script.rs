//! Indentation-aware text builder for generated source.

/// Accumulates generated source text, tracking the current indentation level.
///
/// Lines are indented by one unit per level; the unit defaults to four
/// spaces.
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    out: String,
    unit: String,
    level: usize,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::with_indent("    ")
    }

    pub fn with_indent(unit: &str) -> Self {
        Self {
            out: String::new(),
            unit: unit.to_string(),
            level: 0,
        }
    }

    /// Append a line at the current indentation level.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn unindent(&mut self) {
        debug_assert!(self.level > 0, "unbalanced unindent");
        self.level = self.level.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_nested_lines() {
        let mut sb = ScriptBuilder::new();
        sb.line("interface Foo {");
        sb.indent();
        sb.line("bar: string;");
        sb.unindent();
        sb.line("}");
        assert_eq!(sb.into_string(), "interface Foo {\n    bar: string;\n}\n");
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let mut sb = ScriptBuilder::new();
        sb.indent();
        sb.blank();
        sb.line("x");
        assert_eq!(sb.into_string(), "\n    x\n");
    }

    #[test]
    fn custom_indent_unit() {
        let mut sb = ScriptBuilder::with_indent("\t");
        sb.indent();
        sb.line("a");
        assert_eq!(sb.into_string(), "\ta\n");
    }
}
