use std::collections::HashMap;

use crate::arena::{Handle, RecordArena};
use crate::config::LoaderConfig;
use crate::data::{FissionYield, LoadStage, Nuclide, Reaction, ReactionKind};
use crate::error::Result;

//=====================================================================
// Pass 3: fission-yield branching.
//
// Yield chains arrive pre-sorted from the external yield reader, keyed
// by MT. Each chain entry ends up on exactly one reaction record: the
// primary takes the head, duplicates take the rest. The interpolation
// window around each entry is seeded open-ended and closed in a final
// backfill step once every record knows its chain position.
//=====================================================================

pub fn apply_yield_branches(
    nuclide: &mut Nuclide,
    reactions: &mut RecordArena<Reaction>,
    yields: &RecordArena<FissionYield>,
    chains: &HashMap<i32, Handle<FissionYield>>,
    config: &LoaderConfig,
) -> Result<()> {
    if !nuclide.check_stage(LoadStage::SecondaryBranched)? {
        return Ok(());
    }

    let snapshot: Vec<Handle<Reaction>> = reactions.iter(nuclide.reactions).collect();
    let mut attached = 0;
    for primary in snapshot {
        if reactions[primary].is_branch() {
            continue;
        }
        let Some(&head) = chains.get(&reactions[primary].mt) else {
            continue;
        };

        // Step 1: the primary takes the chain head.
        seed(&mut reactions[primary], head, yields[head].energy);
        attached += 1;

        // Step 2: one duplicate per remaining entry, spliced in chain
        // order behind the primary.
        if config.enable_energy_dependent_yields {
            let mut anchor = primary;
            let mut entry = yields.next(head);
            while let Some(e) = entry {
                let dup = reactions.duplicate(anchor);
                reactions[dup].kind = ReactionKind::TransportBranch;
                reactions[dup].parent = Some(primary);
                reactions[dup].branch_ratio = None;
                seed(&mut reactions[dup], e, yields[e].energy);
                anchor = dup;
                attached += 1;
                entry = yields.next(e);
            }
        }
    }

    // Step 3: close the open window ends with the true neighbor
    // energies. Must run after step 2, which consumes the chain
    // linkage the neighbor lookup walks.
    let all: Vec<Handle<Reaction>> = reactions.iter(nuclide.reactions).collect();
    for h in all {
        let Some(entry) = reactions[h].yield_ref else {
            continue;
        };
        if let Some(prev) = yields.prev(entry) {
            reactions[h].yield_e[0] = yields[prev].energy;
        }
        if let Some(next) = yields.next(entry) {
            reactions[h].yield_e[2] = yields[next].energy;
        }
    }

    if attached > 0 {
        log::debug!("{}: {} yield-carrying records", nuclide.name, attached);
    }
    nuclide.stage = LoadStage::YieldBranched;
    Ok(())
}

fn seed(reaction: &mut Reaction, entry: Handle<FissionYield>, energy: f64) {
    reaction.yield_ref = Some(entry);
    reaction.yield_e = [f64::NEG_INFINITY, energy, f64::INFINITY];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::{apply_isomeric_branches, apply_secondary_branches};
    use crate::utils::testing::{decode_test_table, find_mt, fissile_table, mt_count};

    fn advance_to_secondary(
        nuclide: &mut Nuclide,
        arena: &mut RecordArena<Reaction>,
        config: &LoaderConfig,
    ) {
        apply_isomeric_branches(nuclide, arena, &[], config).unwrap();
        apply_secondary_branches(nuclide, arena, config).unwrap();
    }

    fn three_point_chain(
        yields: &mut RecordArena<FissionYield>,
    ) -> HashMap<i32, Handle<FissionYield>> {
        let head = yields.alloc(FissionYield::new(2.53e-8, vec![(541350, 0.065)]));
        yields.append(head, FissionYield::new(0.5, vec![(541350, 0.061)]));
        yields.append(head, FissionYield::new(14.0, vec![(541350, 0.052)]));
        HashMap::from([(18, head)])
    }

    #[test]
    fn test_yield_window_ordering() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        advance_to_secondary(&mut nuclide, &mut arena, &config);
        let mut yields = RecordArena::new(16);
        let chains = three_point_chain(&mut yields);

        apply_yield_branches(&mut nuclide, &mut arena, &yields, &chains, &config).unwrap();

        let records: Vec<_> = arena
            .iter(nuclide.reactions)
            .filter(|&h| arena[h].mt == 18)
            .collect();
        assert_eq!(records.len(), 3);
        for &h in &records {
            let r = &arena[h];
            let entry = r.yield_ref.unwrap();
            assert_eq!(r.yield_e[1], yields[entry].energy);
            assert!(r.yield_e[0] < r.yield_e[1] && r.yield_e[1] < r.yield_e[2]);
        }
        // Chain ends stay open, interior windows are closed by the
        // backfill.
        assert_eq!(arena[records[0]].yield_e, [f64::NEG_INFINITY, 2.53e-8, 0.5]);
        assert_eq!(arena[records[1]].yield_e, [2.53e-8, 0.5, 14.0]);
        assert_eq!(arena[records[2]].yield_e, [0.5, 14.0, f64::INFINITY]);

        // The primary keeps the head; duplicates branch off it.
        assert_eq!(arena[records[0]].kind, ReactionKind::Partial);
        for &h in &records[1..] {
            assert_eq!(arena[h].kind, ReactionKind::TransportBranch);
            assert_eq!(arena[h].parent, Some(records[0]));
        }
        assert_eq!(nuclide.stage, LoadStage::YieldBranched);
    }

    #[test]
    fn test_energy_dependence_disabled_keeps_one_record() {
        let config = LoaderConfig {
            enable_energy_dependent_yields: false,
            ..LoaderConfig::default()
        };
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        advance_to_secondary(&mut nuclide, &mut arena, &config);
        let mut yields = RecordArena::new(16);
        let chains = three_point_chain(&mut yields);

        apply_yield_branches(&mut nuclide, &mut arena, &yields, &chains, &config).unwrap();

        assert_eq!(mt_count(&arena, &nuclide, 18), 1);
        let primary = find_mt(&arena, &nuclide, 18);
        assert!(arena[primary].yield_ref.is_some());
        assert_eq!(arena[primary].yield_e, [f64::NEG_INFINITY, 2.53e-8, 0.5]);
    }

    #[test]
    fn test_no_chain_is_a_no_op() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        advance_to_secondary(&mut nuclide, &mut arena, &config);
        let yields: RecordArena<FissionYield> = RecordArena::new(16);
        let before = arena.len();

        apply_yield_branches(&mut nuclide, &mut arena, &yields, &HashMap::new(), &config).unwrap();

        assert_eq!(arena.len(), before);
        let primary = find_mt(&arena, &nuclide, 18);
        assert_eq!(arena[primary].yield_ref, None);
        assert_eq!(nuclide.stage, LoadStage::YieldBranched);
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let config = LoaderConfig::default();
        let (mut arena, mut nuclide) = decode_test_table(&fissile_table(), &config);
        advance_to_secondary(&mut nuclide, &mut arena, &config);
        let mut yields = RecordArena::new(16);
        let chains = three_point_chain(&mut yields);

        apply_yield_branches(&mut nuclide, &mut arena, &yields, &chains, &config).unwrap();
        let count = arena.len();
        apply_yield_branches(&mut nuclide, &mut arena, &yields, &chains, &config).unwrap();
        assert_eq!(arena.len(), count);
    }
}
