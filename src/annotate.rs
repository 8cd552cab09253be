//! Per-line roles, for whatever draws the merged lines.

use crate::merge::MergeState;

/// What a merged line is, relative to the pending conflict regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LineRole {
    /// Outside every region.
    Unchanged,
    /// First line of a region's old side.
    OldMarker,
    /// Removed content.
    Old,
    Separator,
    /// Inserted content.
    New,
    /// Last line of a region's new side.
    NewMarker,
}

impl LineRole {
    pub fn is_conflict(self) -> bool {
        self != LineRole::Unchanged
    }

    /// Prefix used when printing a merged line as plain text.
    pub fn gutter(self) -> char {
        match self {
            LineRole::Unchanged => ' ',
            LineRole::OldMarker | LineRole::Old => '-',
            LineRole::Separator => '|',
            LineRole::New | LineRole::NewMarker => '+',
        }
    }
}

impl MergeState {
    /// One role per merged line. Indices a region records past the end of
    /// the merged lines are ignored.
    pub fn line_roles(&self) -> Vec<LineRole> {
        let mut roles = vec![LineRole::Unchanged; self.merged_lines.len()];
        let mut set = |line: usize, role: LineRole| {
            if let Some(slot) = roles.get_mut(line) {
                *slot = role;
            }
        };

        for region in &self.regions {
            for (i, &line) in region.old_lines.iter().enumerate() {
                set(line, if i == 0 { LineRole::OldMarker } else { LineRole::Old });
            }
            set(region.merge_line, LineRole::Separator);
            let last = region.new_lines.len().saturating_sub(1);
            for (i, &line) in region.new_lines.iter().enumerate() {
                set(line, if i == last { LineRole::NewMarker } else { LineRole::New });
            }
        }
        roles
    }
}

#[cfg(test)]
mod line_roles_tests {
    use super::LineRole::*;
    use crate::merge::merge;
    use crate::resolve::Side;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_roles() {
        let state = merge(&["a", "b", "c"], &["a", "x", "y", "c"]).unwrap();
        assert_eq!(
            state.line_roles(),
            vec![Unchanged, OldMarker, Old, Separator, New, New, NewMarker, Unchanged]
        );
    }

    #[test]
    fn test_line_roles_after_resolve() {
        let state = merge(&["a", "b", "c"], &["a", "c", "d"]).unwrap();
        assert_eq!(
            state.line_roles(),
            vec![
                Unchanged, OldMarker, Old, Separator, NewMarker, Unchanged, OldMarker, Separator,
                New, NewMarker
            ]
        );

        let resolved = state.resolve_side(0, Side::New).unwrap();
        assert_eq!(
            resolved.line_roles(),
            vec![Unchanged, Unchanged, Unchanged, OldMarker, Separator, New, NewMarker]
        );
    }

    #[test]
    fn test_gutter() {
        assert_eq!(Unchanged.gutter(), ' ');
        assert_eq!(OldMarker.gutter(), '-');
        assert_eq!(NewMarker.gutter(), '+');
        assert!(!Unchanged.is_conflict());
        assert!(Separator.is_conflict());
    }
}
