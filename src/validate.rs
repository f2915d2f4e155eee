use std::collections::HashSet;

use crate::arena::{Handle, RecordArena};
use crate::data::{FissionYield, LoadStage, Nuclide, Reaction, is_fission_family};
use crate::error::{GraceError, Result};

//=====================================================================
// Consistency validation.
//
// Structural checks over the finished graph. A failure here means the
// builder produced an inconsistent structure, not that the input was
// bad, so every violation is fatal.
//=====================================================================

pub fn validate_graph(
    nuclide: &mut Nuclide,
    reactions: &RecordArena<Reaction>,
    yields: &RecordArena<FissionYield>,
) -> Result<()> {
    if !nuclide.check_stage(LoadStage::YieldBranched)? {
        return Ok(());
    }

    let members: Vec<Handle<Reaction>> = reactions.iter(nuclide.reactions).collect();
    let member_set: HashSet<Handle<Reaction>> = members.iter().copied().collect();

    check_yield_windows(nuclide, reactions, yields, &members)?;
    check_fissile_q(nuclide, reactions, &members)?;
    check_parent_links(nuclide, reactions, &members, &member_set)?;
    check_isomeric_pairs(nuclide, reactions, &members)?;

    log::debug!("{}: graph validated, {} records", nuclide.name, members.len());
    nuclide.stage = LoadStage::Validated;
    Ok(())
}

fn check_yield_windows(
    nuclide: &Nuclide,
    reactions: &RecordArena<Reaction>,
    yields: &RecordArena<FissionYield>,
    members: &[Handle<Reaction>],
) -> Result<()> {
    for &h in members {
        let r = &reactions[h];
        let Some(entry) = r.yield_ref else {
            continue;
        };
        let [ie0, ie1, ie2] = r.yield_e;
        if !(ie0 < ie1 && ie1 < ie2) {
            return Err(GraceError::invariant(format!(
                "{}: MT {} yield window is not ordered ({} / {} / {})",
                nuclide.name, r.mt, ie0, ie1, ie2
            )));
        }
        if ie1 != yields[entry].energy {
            return Err(GraceError::invariant(format!(
                "{}: MT {} yield window centers on {} but its entry is at {}",
                nuclide.name,
                r.mt,
                ie1,
                yields[entry].energy
            )));
        }
    }
    Ok(())
}

fn check_fissile_q(
    nuclide: &Nuclide,
    reactions: &RecordArena<Reaction>,
    members: &[Handle<Reaction>],
) -> Result<()> {
    if !nuclide.fissile {
        return Ok(());
    }
    let has_q = members.iter().any(|&h| {
        let r = &reactions[h];
        is_fission_family(r.mt) && r.q_value >= 0.0
    });
    if !has_q {
        return Err(GraceError::invariant(format!(
            "{}: fissile nuclide has no fission channel with non-negative Q",
            nuclide.name
        )));
    }
    Ok(())
}

fn check_parent_links(
    nuclide: &Nuclide,
    reactions: &RecordArena<Reaction>,
    members: &[Handle<Reaction>],
    member_set: &HashSet<Handle<Reaction>>,
) -> Result<()> {
    for &h in members {
        let r = &reactions[h];
        if r.is_branch() {
            let Some(parent) = r.parent else {
                return Err(GraceError::invariant(format!(
                    "{}: MT {} branch has no parent",
                    nuclide.name, r.mt
                )));
            };
            if parent == h {
                return Err(GraceError::invariant(format!(
                    "{}: MT {} branch is its own parent",
                    nuclide.name, r.mt
                )));
            }
            if !member_set.contains(&parent) {
                return Err(GraceError::invariant(format!(
                    "{}: MT {} branch parent is outside the reaction list",
                    nuclide.name, r.mt
                )));
            }
        } else if r.parent.is_some() {
            return Err(GraceError::invariant(format!(
                "{}: MT {} is not a branch but carries a parent link",
                nuclide.name, r.mt
            )));
        }
    }
    Ok(())
}

/// Every MT with an excited-final-state record must form exactly one
/// pair, linked across the pair in either direction (the inelastic
/// swap reverses it).
fn check_isomeric_pairs(
    nuclide: &Nuclide,
    reactions: &RecordArena<Reaction>,
    members: &[Handle<Reaction>],
) -> Result<()> {
    let mut checked: HashSet<i32> = HashSet::new();
    for &h in members {
        if reactions[h].final_state == 0 {
            continue;
        }
        let mt = reactions[h].mt;
        if !checked.insert(mt) {
            continue;
        }

        let ground: Vec<Handle<Reaction>> = members
            .iter()
            .copied()
            .filter(|&m| reactions[m].mt == mt && reactions[m].final_state == 0)
            .collect();
        let excited: Vec<Handle<Reaction>> = members
            .iter()
            .copied()
            .filter(|&m| reactions[m].mt == mt && reactions[m].final_state != 0)
            .collect();
        if ground.len() != 1 {
            return Err(GraceError::invariant(format!(
                "{}: MT {} has {} ground-state representatives",
                nuclide.name,
                mt,
                ground.len()
            )));
        }
        if excited.len() != 1 {
            return Err(GraceError::invariant(format!(
                "{}: MT {} has {} excited-state records",
                nuclide.name,
                mt,
                excited.len()
            )));
        }

        let rep = ground[0];
        let exc = excited[0];
        let linked_forward = reactions[exc].parent == Some(rep);
        let linked_reversed = reactions[rep].parent == Some(exc);
        if !linked_forward && !linked_reversed {
            return Err(GraceError::invariant(format!(
                "{}: MT {} isomeric pair is not linked across the pair",
                nuclide.name, mt
            )));
        }
    }
    Ok(())
}
