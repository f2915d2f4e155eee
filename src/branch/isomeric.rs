use crate::arena::RecordArena;
use crate::config::LoaderConfig;
use crate::data::{BranchListEntry, BranchRatio, LoadStage, Nuclide, Reaction, ReactionKind};
use crate::error::{GraceError, Result};

//=====================================================================
// Pass 1: isomeric branching.
//
// External branch-list entries matching the nuclide's ZAI split their
// reaction into a pair: the representative keeps the ratio and the
// ground-state role, the duplicate carries the excited final state and
// points back through `parent`. Re-claims of an already branched MT
// only swap the stored ratio; the pair is created exactly once.
//=====================================================================

pub fn apply_isomeric_branches(
    nuclide: &mut Nuclide,
    reactions: &mut RecordArena<Reaction>,
    entries: &[BranchListEntry],
    config: &LoaderConfig,
) -> Result<()> {
    if !nuclide.check_stage(LoadStage::Decoded)? {
        return Ok(());
    }

    let mut fixed_applied = 0usize;
    let mut pairs_created = 0usize;

    for entry in entries.iter().filter(|e| e.zai == nuclide.zai) {
        // The representative carries final state 0; pass-1 duplicates
        // are the only branches alive at this stage and never do.
        let rep = reactions
            .iter(nuclide.reactions)
            .find(|&h| reactions[h].mt == entry.mt && reactions[h].final_state == 0);
        let Some(rep) = rep else {
            log::debug!(
                "{}: no MT {} channel for a branch entry, skipped",
                nuclide.name,
                entry.mt
            );
            continue;
        };

        if let BranchRatio::Fixed(_) = entry.ratio {
            fixed_applied += 1;
            if fixed_applied > config.max_fixed_branch_entries {
                return Err(GraceError::limit(format!(
                    "{}: {} fixed branch entries, ceiling is {}",
                    nuclide.name, fixed_applied, config.max_fixed_branch_entries
                )));
            }
            // A tabulated ratio keeps its claim against later scalars.
            if matches!(
                reactions[rep].branch_ratio,
                Some(BranchRatio::Tabulated { .. })
            ) {
                continue;
            }
        }

        let already_claimed = reactions[rep].branch_ratio.is_some();
        reactions[rep].branch_ratio = Some(entry.ratio.clone());
        nuclide.has_branch_data = true;
        if already_claimed {
            continue;
        }

        let dup = reactions.duplicate(rep);
        reactions[dup].final_state = 1;
        reactions[dup].branch_ratio = None;
        if entry.mt == 4 && nuclide.isomeric_state() != 0 {
            // On an excited target the ground-state exit of any-level
            // inelastic is the split-off path, so the pair roles
            // reverse while the final states stay put.
            reactions[dup].kind = ReactionKind::Partial;
            reactions[dup].parent = None;
            reactions[rep].kind = ReactionKind::TransportBranch;
            reactions[rep].parent = Some(dup);
        } else {
            reactions[dup].kind = ReactionKind::TransportBranch;
            reactions[dup].parent = Some(rep);
        }
        pairs_created += 1;
    }

    if pairs_created > 0 {
        log::debug!("{}: {} isomeric pairs", nuclide.name, pairs_created);
    }
    nuclide.stage = LoadStage::IsomerBranched;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Linked;
    use crate::utils::testing::{decode_test_table, find_mt, isomeric_table, mt_count, simple_table};

    fn fixed_entry(zai: i32, mt: i32, fraction: f64) -> BranchListEntry {
        BranchListEntry {
            zai,
            mt,
            ratio: BranchRatio::Fixed(fraction),
        }
    }

    #[test]
    fn test_isomeric_pair() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let entries = vec![fixed_entry(260560, 102, 0.3)];

        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();

        assert_eq!(mt_count(&arena, &nuclide, 102), 2);
        let rep = find_mt(&arena, &nuclide, 102);
        assert_eq!(arena[rep].final_state, 0);
        assert_eq!(arena[rep].kind, ReactionKind::Partial);
        assert_eq!(arena[rep].branch_ratio, Some(BranchRatio::Fixed(0.3)));

        // The duplicate sits right after its source in list order.
        let dup = arena.next(rep).unwrap();
        assert_eq!(arena[dup].mt, 102);
        assert_eq!(arena[dup].final_state, 1);
        assert_eq!(arena[dup].kind, ReactionKind::TransportBranch);
        assert_eq!(arena[dup].parent, Some(rep));
        assert_eq!(arena[dup].branch_ratio, None);
        // The excited path samples the same cross section.
        assert_eq!(arena[dup].xs, arena[rep].xs);

        assert!(nuclide.has_branch_data);
        assert_eq!(nuclide.stage, LoadStage::IsomerBranched);
    }

    #[test]
    fn test_duplicate_differs_only_in_links() {
        let config = LoaderConfig::default();
        let (mut arena, nuclide) = decode_test_table(&simple_table(), &config);
        let rep = find_mt(&arena, &nuclide, 102);

        let dup = arena.duplicate(rep);
        let mut a = arena[rep].clone();
        let mut b = arena[dup].clone();
        a.set_next(None);
        a.set_prev(None);
        b.set_next(None);
        b.set_prev(None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tabulated_claim_beats_fixed() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let tabulated = BranchRatio::Tabulated {
            energy: vec![1.0e-11, 20.0],
            fraction: vec![0.55, 0.4],
        };
        let entries = vec![
            fixed_entry(260560, 102, 0.5),
            BranchListEntry {
                zai: 260560,
                mt: 102,
                ratio: tabulated.clone(),
            },
            fixed_entry(260560, 102, 0.4),
        ];

        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();

        // The tabulated entry replaced the first scalar and the second
        // scalar bounced off; the pair itself was created only once.
        assert_eq!(mt_count(&arena, &nuclide, 102), 2);
        let rep = find_mt(&arena, &nuclide, 102);
        assert_eq!(arena[rep].branch_ratio, Some(tabulated));
    }

    #[test]
    fn test_fixed_entry_ceiling_is_fatal() {
        let config = LoaderConfig {
            max_fixed_branch_entries: 1,
            ..LoaderConfig::default()
        };
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let entries = vec![fixed_entry(260560, 102, 0.3), fixed_entry(260560, 16, 0.1)];

        let err = apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config);
        assert!(matches!(err, Err(GraceError::Limit(_))));
    }

    #[test]
    fn test_inelastic_swap_on_isomeric_target() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&isomeric_table(), &config);
        assert_eq!(nuclide.isomeric_state(), 1);
        let entries = vec![fixed_entry(952421, 4, 0.2)];

        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();

        assert_eq!(mt_count(&arena, &nuclide, 4), 2);
        let rep = find_mt(&arena, &nuclide, 4);
        let dup = arena.next(rep).unwrap();
        // Roles are reversed: the duplicate is the sampled record and
        // the representative branches off it, ratio still on the
        // representative.
        assert_eq!(arena[rep].final_state, 0);
        assert_eq!(arena[rep].kind, ReactionKind::TransportBranch);
        assert_eq!(arena[rep].parent, Some(dup));
        assert_eq!(arena[rep].branch_ratio, Some(BranchRatio::Fixed(0.2)));
        assert_eq!(arena[dup].final_state, 1);
        assert_eq!(arena[dup].kind, ReactionKind::Partial);
        assert_eq!(arena[dup].parent, None);
    }

    #[test]
    fn test_unmatched_entries_are_skipped() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let before = arena.len();
        let entries = vec![
            // Different nuclide.
            fixed_entry(922350, 102, 0.3),
            // Channel the table does not carry.
            fixed_entry(260560, 107, 0.1),
        ];

        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();

        assert_eq!(arena.len(), before);
        assert!(!nuclide.has_branch_data);
        assert_eq!(nuclide.stage, LoadStage::IsomerBranched);
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let entries = vec![fixed_entry(260560, 102, 0.3)];

        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();
        let count = arena.len();
        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();
        assert_eq!(arena.len(), count);
        assert_eq!(nuclide.stage, LoadStage::IsomerBranched);
    }
}
