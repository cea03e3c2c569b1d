//! Collision-free temporary identifier allocation.

use crease_syntax::ParsedUnit;
use log::debug;

use crate::walk::{walk, Flow};

/// Reserved prefix for synthesized temporaries.
pub const TMP_VAR_PREFIX: &str = "__trans_tmp_";

/// Allocates temporary names that cannot collide with any identifier
/// already visible in the translation unit, nor with names handed out
/// earlier in the same run.
#[derive(Debug)]
pub struct NameAllocator {
    next_suffix: u32,
}

impl NameAllocator {
    /// Scans every identifier in the unit that carries the reserved
    /// prefix and starts numbering past the largest suffix found.
    pub fn scan(unit: &ParsedUnit) -> Self {
        let mut max_suffix: Option<u32> = None;
        walk(unit.root(), &mut |node| {
            if node.kind().ends_with("identifier") {
                if let Ok(name) = node.utf8_text(unit.source().as_bytes()) {
                    if let Some(rest) = name.strip_prefix(TMP_VAR_PREFIX) {
                        if let Ok(suffix) = rest.parse::<u32>() {
                            max_suffix = Some(max_suffix.map_or(suffix, |m| m.max(suffix)));
                        }
                    }
                }
            }
            Flow::Continue
        });
        let next_suffix = max_suffix.map_or(0, |m| m + 1);
        debug!("temporary names start at {}{}", TMP_VAR_PREFIX, next_suffix);
        NameAllocator { next_suffix }
    }

    /// Mints the next free temporary name.
    pub fn fresh(&mut self) -> String {
        let name = format!("{}{}", TMP_VAR_PREFIX, self.next_suffix);
        self.next_suffix += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_syntax::CSourceParser;

    #[test]
    fn starts_at_zero_for_clean_unit() {
        let unit = CSourceParser::new()
            .unwrap()
            .parse_unit("int main(void) { return 0; }\n")
            .unwrap();
        let mut names = NameAllocator::scan(&unit);
        assert_eq!(names.fresh(), "__trans_tmp_0");
        assert_eq!(names.fresh(), "__trans_tmp_1");
    }

    #[test]
    fn skips_past_existing_temporaries() {
        let unit = CSourceParser::new()
            .unwrap()
            .parse_unit("int __trans_tmp_7;\nint main(void) { return __trans_tmp_7; }\n")
            .unwrap();
        let mut names = NameAllocator::scan(&unit);
        assert_eq!(names.fresh(), "__trans_tmp_8");
    }

    #[test]
    fn ignores_unrelated_identifiers() {
        let unit = CSourceParser::new()
            .unwrap()
            .parse_unit("int __trans_tmp_x; int tmp_3;\nint main(void) { return 0; }\n")
            .unwrap();
        let mut names = NameAllocator::scan(&unit);
        assert_eq!(names.fresh(), "__trans_tmp_0");
    }
}
