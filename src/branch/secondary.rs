use crate::arena::{Handle, RecordArena};
use crate::config::LoaderConfig;
use crate::data::{
    LoadStage, Nuclide, Reaction, ReactionKind, SecondaryParticle, charged_emission, zai_from_za,
};
use crate::error::Result;

//=====================================================================
// Pass 2: secondary-particle branching.
//
// Burnup bookkeeping for charged ejectiles. Every composite channel
// that emits light charged particles gets one removal branch per
// particle species, carrying the residual nuclide and the per-reaction
// emission count. Branches spawned from the reaction's own MT follow
// the incident particle (TransportBranch); branches spawned from a
// chained secondary-emission code are decay paths (DecayBranch).
//=====================================================================

pub fn apply_secondary_branches(
    nuclide: &mut Nuclide,
    reactions: &mut RecordArena<Reaction>,
    config: &LoaderConfig,
) -> Result<()> {
    if !nuclide.check_stage(LoadStage::IsomerBranched)? {
        return Ok(());
    }
    if !config.enable_secondary_branching {
        log::debug!("{}: secondary-particle branching disabled", nuclide.name);
        nuclide.stage = LoadStage::SecondaryBranched;
        return Ok(());
    }

    // The loop splices branches into the chain it walks, so it runs
    // over a snapshot and never revisits what it spawned.
    let snapshot: Vec<Handle<Reaction>> = reactions.iter(nuclide.reactions).collect();
    let mut spawned = 0;
    for source in snapshot {
        if reactions[source].is_branch() {
            continue;
        }
        let own_mt = reactions[source].mt;
        spawned += spawn_removal_branches(
            nuclide,
            reactions,
            source,
            own_mt,
            ReactionKind::TransportBranch,
        );
        let modes = reactions[source].secondary_modes;
        for &code in modes.iter().filter(|&&code| code != 0) {
            spawned += spawn_removal_branches(
                nuclide,
                reactions,
                source,
                code,
                ReactionKind::DecayBranch,
            );
        }
    }

    if spawned > 0 {
        log::debug!("{}: {} particle-removal branches", nuclide.name, spawned);
    }
    nuclide.stage = LoadStage::SecondaryBranched;
    Ok(())
}

/// Spawn the removal branches one emission code implies. Returns the
/// number of branches spliced in.
fn spawn_removal_branches(
    nuclide: &Nuclide,
    reactions: &mut RecordArena<Reaction>,
    source: Handle<Reaction>,
    code: i32,
    kind: ReactionKind,
) -> usize {
    let Some(emission) = charged_emission(code) else {
        return 0;
    };

    // Residual of the whole reaction: target plus the incident
    // neutron, minus every ejectile.
    let charged_z: i32 = emission
        .particles
        .iter()
        .map(|&(p, count)| p.za().0 * count as i32)
        .sum();
    let charged_a: i32 = emission
        .particles
        .iter()
        .map(|&(p, count)| p.za().1 * count as i32)
        .sum();
    let z_res = nuclide.z() - charged_z;
    let a_res = nuclide.a() + 1 - emission.neutrons as i32 - charged_a;
    if z_res < 1 || a_res < z_res {
        log::warn!(
            "{}: MT {} emission leaves no physical residual (Z {}, A {}), branch skipped",
            nuclide.name,
            code,
            z_res,
            a_res
        );
        return 0;
    }

    // Duplicating from a moving anchor keeps the branches in tuple
    // order in the list.
    let mut anchor = source;
    for &(particle, count) in emission.particles {
        let mut mt = particle.removal_mt();
        let mut multiplier = count as f64;
        let mut recoil = zai_from_za(1000 * z_res + a_res, 0);
        // Be-8 breaks up into two alphas before anything else can
        // happen to it, so the branch books one more alpha and the
        // recoil becomes He-4. Explicitly not generalized.
        if recoil == 40080 {
            mt = SecondaryParticle::Alpha.removal_mt();
            multiplier += 1.0;
            recoil = 20040;
        }

        let dup = reactions.duplicate(anchor);
        let branch = &mut reactions[dup];
        branch.mt = mt;
        branch.kind = kind;
        branch.final_state = 0;
        branch.parent = Some(source);
        branch.branch_ratio = None;
        branch.secondary_modes = [0; 5];
        branch.recoil_zai = recoil;
        branch.branch_multiplier = multiplier;
        anchor = dup;
    }
    emission.particles.len()
}
