//! Property-based tests for the merge and resolution passes.
//!
//! Lines are drawn from a small alphabet so that duplicate lines, and
//! several regions per merge, are the common case.

use merge_regions::{diff, merge, LineRole, MergeState, RunKind, Side};
use proptest::prelude::*;

/// Strategy for generating a line sequence with many repeated lines
fn lines_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", "c", "}", "", "return x;"]),
        0..16,
    )
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Old), Just(Side::New)]
}

/// Length of a longest common subsequence, by dynamic programming.
fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table[a.len()][b.len()]
}

/// Lines of `state` whose role is in `roles`, in order.
fn lines_with_roles<'s>(state: &'s MergeState, roles: &[LineRole]) -> Vec<&'s str> {
    state
        .lines()
        .iter()
        .zip(state.line_roles())
        .filter(|(_, role)| roles.contains(role))
        .map(|(line, _)| line.as_str())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: merging a sequence with itself yields no regions and the
    /// sequence unchanged.
    #[test]
    fn merge_with_itself_is_identity(lines in lines_strategy()) {
        let state = merge(&lines, &lines).unwrap();
        prop_assert!(state.regions().is_empty());
        prop_assert_eq!(state.lines(), lines.as_slice());
    }

    /// Property: no content line is dropped or duplicated. Unchanged plus
    /// old content reads back as the original, unchanged plus new content
    /// as the candidate.
    #[test]
    fn content_lines_are_conserved(
        original in lines_strategy(),
        candidate in lines_strategy()
    ) {
        let state = merge(&original, &candidate).unwrap();
        prop_assert_eq!(
            lines_with_roles(&state, &[LineRole::Unchanged, LineRole::Old]),
            original.clone()
        );
        prop_assert_eq!(
            lines_with_roles(&state, &[LineRole::Unchanged, LineRole::New]),
            candidate.clone()
        );
        let markers = lines_with_roles(
            &state,
            &[LineRole::OldMarker, LineRole::Separator, LineRole::NewMarker],
        );
        prop_assert_eq!(markers.len(), 3 * state.regions().len());
    }

    /// Property: every region is non-empty on both sides, strictly
    /// increasing, and wrapped tightly around its separator.
    #[test]
    fn regions_are_well_formed(
        original in lines_strategy(),
        candidate in lines_strategy()
    ) {
        let state = merge(&original, &candidate).unwrap();
        prop_assert_eq!(state.validate(), Ok(()));
        for region in state.regions() {
            prop_assert!(!region.old_lines.is_empty());
            prop_assert!(!region.new_lines.is_empty());
            prop_assert!(region.old_lines.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(region.new_lines.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(region.merge_line, region.old_lines[region.old_lines.len() - 1] + 1);
            prop_assert_eq!(region.new_lines[0], region.merge_line + 1);
        }
    }

    /// Property: the default diff keeps a longest common subsequence.
    #[test]
    fn default_diff_is_minimal(
        original in lines_strategy(),
        candidate in lines_strategy()
    ) {
        let equal: usize = diff(&original, &candidate)
            .iter()
            .filter(|run| run.kind == RunKind::Equal)
            .map(|run| run.len())
            .sum();
        prop_assert_eq!(equal, lcs_len(&original, &candidate));
    }

    /// Property: resolving region 0 shifts every later region down by the
    /// number of lines removed and keeps their shape and order.
    #[test]
    fn resolving_first_region_shifts_the_rest(
        original in lines_strategy(),
        candidate in lines_strategy(),
        side in side_strategy()
    ) {
        let state = merge(&original, &candidate).unwrap();
        prop_assume!(state.regions().len() >= 2);

        let resolved = state.resolve_side(0, side).unwrap();
        let removed = state.lines().len() - resolved.lines().len();
        prop_assert_eq!(removed, state.regions()[0].lines_to_delete(side).len() + 1);
        prop_assert_eq!(resolved.regions().len(), state.regions().len() - 1);

        for (before, after) in state.regions()[1..].iter().zip(resolved.regions()) {
            prop_assert_eq!(
                after.old_lines.clone(),
                before.old_lines.iter().map(|l| l - removed).collect::<Vec<_>>()
            );
            prop_assert_eq!(after.merge_line, before.merge_line - removed);
            prop_assert_eq!(
                after.new_lines.clone(),
                before.new_lines.iter().map(|l| l - removed).collect::<Vec<_>>()
            );
            // the shifted indices still point at the same text
            for (&b, &a) in before.old_lines.iter().zip(&after.old_lines) {
                prop_assert_eq!(&state.lines()[b], &resolved.lines()[a]);
            }
            for (&b, &a) in before.new_lines.iter().zip(&after.new_lines) {
                prop_assert_eq!(&state.lines()[b], &resolved.lines()[a]);
            }
        }
        prop_assert_eq!(resolved.validate(), Ok(()));
    }

    /// Property: keeping one side everywhere gives back that side's input
    /// once the surviving marker lines are dropped.
    #[test]
    fn resolving_everything_restores_one_side(
        original in lines_strategy(),
        candidate in lines_strategy(),
        side in side_strategy()
    ) {
        let state = merge(&original, &candidate).unwrap();
        let resolved = state.resolve_all(side).unwrap();
        let (marker, expected) = match side {
            Side::Old => (">>>>>>> OLD CODE", &original),
            Side::New => (">>>>>>> NEW CODE", &candidate),
        };
        let content: Vec<&str> = resolved
            .lines()
            .iter()
            .map(String::as_str)
            .filter(|line| *line != marker)
            .collect();
        prop_assert_eq!(&content, expected);
    }
}
