use std::fmt::Write;

/// 令牌明细渲染钩子
pub trait PrettyRenderer {
    /// 单值行，如 `Type: Composite.Data.Types.IPage`
    fn add_row(&mut self, label: &str, value: &str);

    /// 整行明细：标签加若干 (名称, 值) 条目
    fn add_full_row(&mut self, label: &str, entries: &[(&str, &str)]);
}

/// 纯文本渲染器
///
/// ```text
/// Type: Composite.Data.Types.IPage
/// Id:
///   Id: 42
/// ```
#[derive(Debug, Default, Clone)]
pub struct TextRenderer {
    out: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl PrettyRenderer for TextRenderer {
    fn add_row(&mut self, label: &str, value: &str) {
        let _ = writeln!(self.out, "{label}: {value}");
    }

    fn add_full_row(&mut self, label: &str, entries: &[(&str, &str)]) {
        let _ = writeln!(self.out, "{label}:");
        for (name, value) in entries {
            let _ = writeln!(self.out, "  {name}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_layout() {
        let mut r = TextRenderer::new();
        r.add_row("Type", "Page");
        r.add_full_row("Id", &[("Id", "42"), ("Locale", "en")]);
        assert_eq!(r.as_str(), "Type: Page\nId:\n  Id: 42\n  Locale: en\n");
    }
}
