//! Terminal output helpers

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl HumanFormatter {
    pub fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    pub fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    pub fn info(&self, message: &str) {
        println!("  {}", message);
    }
}

/// `850ms`, `1.5s`
pub fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

/// `1 record`, `2 records`
pub fn count(n: u32, noun: &str) -> String {
    format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
}
