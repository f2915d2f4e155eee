use crate::arena::{Handle, RecordArena};
use crate::data::{LoadStage, Multiplicity, Nuclide, Reaction, ReactionKind, is_fission_family};
use crate::error::{GraceError, Result};

//=====================================================================
// Graph finalization.
//
// Runs once between the yield pass and validation: hands out the
// transmutation accumulator slots and, on fissile nuclides, appends
// the total-fission pseudo-reaction the one-group bookkeeping sums
// into. Slots go out first so the generic rules never touch the
// pseudo-reaction; it takes its own slot at construction.
//=====================================================================

pub fn finalize_graph(nuclide: &mut Nuclide, reactions: &mut RecordArena<Reaction>) -> Result<()> {
    if !nuclide.check_stage(LoadStage::YieldBranched)? {
        return Ok(());
    }
    // Validation owns the stage advance, so re-entry is caught by the
    // slot counter instead.
    if nuclide.transmute_slots > 0 {
        return Ok(());
    }

    allocate_transmute_slots(nuclide, reactions);

    if nuclide.fissile {
        append_total_fission(nuclide, reactions)?;
    }
    Ok(())
}

fn allocate_transmute_slots(nuclide: &mut Nuclide, reactions: &mut RecordArena<Reaction>) {
    let handles: Vec<Handle<Reaction>> = reactions.iter(nuclide.reactions).collect();
    for h in handles {
        let slot = match reactions[h].kind {
            // A transport branch accumulates separately when its
            // parent chain carries branching data; otherwise it shares
            // its parent's slot.
            ReactionKind::TransportBranch => {
                if chain_carries_branch_data(reactions, h) {
                    Some(next_slot(nuclide))
                } else {
                    parent_slot(reactions, h)
                }
            }
            ReactionKind::DecayBranch => parent_slot(reactions, h),
            ReactionKind::Partial | ReactionKind::Special => {
                if carries_branch_data(&reactions[h]) {
                    Some(next_slot(nuclide))
                } else {
                    None
                }
            }
        };
        reactions[h].transmute_slot = slot;
    }
}

fn carries_branch_data(reaction: &Reaction) -> bool {
    reaction.branch_ratio.is_some() || reaction.yield_ref.is_some()
}

/// Walk the parent links from a record (itself included) looking for
/// branching data.
fn chain_carries_branch_data(reactions: &RecordArena<Reaction>, start: Handle<Reaction>) -> bool {
    let mut cursor = Some(start);
    while let Some(h) = cursor {
        if carries_branch_data(&reactions[h]) {
            return true;
        }
        cursor = reactions[h].parent;
    }
    false
}

fn parent_slot(reactions: &RecordArena<Reaction>, h: Handle<Reaction>) -> Option<u32> {
    reactions[h].parent.and_then(|p| reactions[p].transmute_slot)
}

fn next_slot(nuclide: &mut Nuclide) -> u32 {
    let slot = nuclide.transmute_slots;
    nuclide.transmute_slots += 1;
    slot
}

fn append_total_fission(nuclide: &mut Nuclide, reactions: &mut RecordArena<Reaction>) -> Result<()> {
    let mut best_q: Option<f64> = None;
    for h in reactions.iter(nuclide.reactions) {
        let r = &reactions[h];
        if is_fission_family(r.mt) && r.q_value >= 0.0 {
            best_q = Some(best_q.map_or(r.q_value, |q: f64| q.max(r.q_value)));
        }
    }
    let Some(q) = best_q else {
        return Err(GraceError::invariant(format!(
            "{}: fissile nuclide has no fission channel with non-negative Q",
            nuclide.name
        )));
    };
    let Some(head) = nuclide.reactions else {
        return Err(GraceError::invariant(format!(
            "{}: fissile nuclide has an empty reaction list",
            nuclide.name
        )));
    };

    let mut pseudo = Reaction::new(18, ReactionKind::Special, q);
    pseudo.multiplicity = Multiplicity::EnergyDependent;
    pseudo.transmute_slot = Some(next_slot(nuclide));
    reactions.append(head, pseudo);
    log::debug!(
        "{}: total-fission pseudo-reaction, Q {} MeV",
        nuclide.name,
        q
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::branch::{apply_isomeric_branches, apply_secondary_branches, apply_yield_branches};
    use crate::config::LoaderConfig;
    use crate::data::{BranchListEntry, BranchRatio, FissionYield};
    use crate::utils::testing::{
        TestChannel, TestTable, decode_test_table, find_mt, fissile_table, mt_count, simple_table,
    };

    fn run_passes(
        nuclide: &mut Nuclide,
        arena: &mut RecordArena<Reaction>,
        entries: &[BranchListEntry],
        chains: &HashMap<i32, Handle<FissionYield>>,
        yields: &RecordArena<FissionYield>,
        config: &LoaderConfig,
    ) {
        apply_isomeric_branches(nuclide, arena, entries, config).unwrap();
        apply_secondary_branches(nuclide, arena, config).unwrap();
        apply_yield_branches(nuclide, arena, yields, chains, config).unwrap();
    }

    #[test]
    fn test_total_fission_pseudo() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        let yields = RecordArena::new(16);
        run_passes(&mut nuclide, &mut arena, &[], &HashMap::new(), &yields, &config);

        finalize_graph(&mut nuclide, &mut arena).unwrap();

        assert_eq!(mt_count(&arena, &nuclide, 18), 2);
        // The pseudo-reaction lands at the chain tail.
        let tail = arena.iter(nuclide.reactions).last().unwrap();
        let pseudo = &arena[tail];
        assert_eq!(pseudo.mt, 18);
        assert_eq!(pseudo.kind, ReactionKind::Special);
        assert_eq!(pseudo.q_value, 193.4);
        assert_eq!(pseudo.multiplicity, Multiplicity::EnergyDependent);
        assert_eq!(pseudo.xs, None);
        assert!(pseudo.transmute_slot.is_some());
        assert_eq!(nuclide.transmute_slots, 1);
    }

    #[test]
    fn test_missing_fission_q_is_fatal() {
        let config = LoaderConfig::default();
        let mut table = fissile_table();
        table.channels[0].q = -5.0;
        let (mut arena, mut nuclide) = decode_test_table(&table, &config);
        assert!(nuclide.fissile);
        let yields = RecordArena::new(16);
        run_passes(&mut nuclide, &mut arena, &[], &HashMap::new(), &yields, &config);

        let err = finalize_graph(&mut nuclide, &mut arena);
        assert!(matches!(err, Err(GraceError::Invariant(_))));
    }

    #[test]
    fn test_isomeric_pair_gets_two_slots() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let entries = vec![BranchListEntry {
            zai: 260560,
            mt: 102,
            ratio: BranchRatio::Fixed(0.3),
        }];
        let yields = RecordArena::new(16);
        run_passes(&mut nuclide, &mut arena, &entries, &HashMap::new(), &yields, &config);

        finalize_graph(&mut nuclide, &mut arena).unwrap();

        let rep = find_mt(&arena, &nuclide, 102);
        let dup = arena.next(rep).unwrap();
        assert_eq!(arena[rep].transmute_slot, Some(0));
        assert_eq!(arena[dup].transmute_slot, Some(1));
        // Unbranched channels accumulate nowhere.
        assert_eq!(arena[find_mt(&arena, &nuclide, 2)].transmute_slot, None);
        assert_eq!(arena[find_mt(&arena, &nuclide, 16)].transmute_slot, None);
        assert_eq!(nuclide.transmute_slots, 2);
    }

    #[test]
    fn test_yield_records_get_own_slots() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        let mut yields = RecordArena::new(16);
        let head = yields.alloc(FissionYield::new(2.53e-8, vec![(541350, 0.065)]));
        yields.append(head, FissionYield::new(0.5, vec![(541350, 0.061)]));
        let chains = HashMap::from([(18, head)]);
        run_passes(&mut nuclide, &mut arena, &[], &chains, &yields, &config);

        finalize_graph(&mut nuclide, &mut arena).unwrap();

        let records: Vec<_> = arena
            .iter(nuclide.reactions)
            .filter(|&h| arena[h].mt == 18)
            .collect();
        // Primary, one yield duplicate, and the pseudo-reaction, each
        // with a distinct slot.
        assert_eq!(records.len(), 3);
        let slots: Vec<_> = records.iter().map(|&h| arena[h].transmute_slot).collect();
        assert_eq!(slots, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(nuclide.transmute_slots, 3);
    }

    #[test]
    fn test_decay_branch_shares_representative_slot() {
        let config = LoaderConfig {
            enable_secondary_branching: true,
            ..LoaderConfig::default()
        };
        let (mut arena, mut nuclide) = decode_test_table(&simple_table(), &config);
        let entries = vec![BranchListEntry {
            zai: 260560,
            mt: 102,
            ratio: BranchRatio::Fixed(0.3),
        }];
        apply_isomeric_branches(&mut nuclide, &mut arena, &entries, &config).unwrap();
        let rep = find_mt(&arena, &nuclide, 102);
        arena[rep].secondary_modes = [22, 0, 0, 0, 0];
        apply_secondary_branches(&mut nuclide, &mut arena, &config).unwrap();
        let yields = RecordArena::new(16);
        apply_yield_branches(&mut nuclide, &mut arena, &yields, &HashMap::new(), &config).unwrap();

        finalize_graph(&mut nuclide, &mut arena).unwrap();

        let decay = find_mt(&arena, &nuclide, 107);
        assert_eq!(arena[decay].kind, ReactionKind::DecayBranch);
        // The decay path books into its parent's accumulator; the
        // isomeric duplicate gets one of its own.
        assert_eq!(arena[decay].transmute_slot, arena[rep].transmute_slot);
        assert!(arena[rep].transmute_slot.is_some());
        let pair_dup = arena
            .iter(nuclide.reactions)
            .find(|&h| arena[h].mt == 102 && arena[h].final_state == 1)
            .unwrap();
        assert_ne!(arena[pair_dup].transmute_slot, arena[rep].transmute_slot);
        assert!(arena[pair_dup].transmute_slot.is_some());
    }

    #[test]
    fn test_branch_without_data_has_no_slot() {
        let config = LoaderConfig {
            enable_secondary_branching: true,
            ..LoaderConfig::default()
        };
        let table = TestTable {
            name: "26056.00c".to_string(),
            atomic_weight_ratio: 55.4544,
            kT: 2.5301e-8,
            za: 26056,
            s: 0,
            energy_grid: vec![1.0e-11, 1.0, 20.0],
            elastic_xs: vec![20.0, 10.0, 5.0],
            channels: vec![TestChannel::new(103, 0.5, 0, 1, vec![0.1, 0.3, 0.6])],
            photon_xs: None,
        };
        let (mut arena, mut nuclide) = decode_test_table(&table, &config);
        let yields = RecordArena::new(16);
        run_passes(&mut nuclide, &mut arena, &[], &HashMap::new(), &yields, &config);

        finalize_graph(&mut nuclide, &mut arena).unwrap();

        // Without branching data anywhere in its chain, the removal
        // branch aliases its parent, which has no slot either.
        let primary = find_mt(&arena, &nuclide, 103);
        let branch = arena.next(primary).unwrap();
        assert_eq!(arena[primary].transmute_slot, None);
        assert_eq!(arena[branch].transmute_slot, None);
        assert_eq!(nuclide.transmute_slots, 0);
    }
}
