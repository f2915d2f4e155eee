use crate::arena::RecordArena;
use crate::blocks::{
    AND, BlockType, ESZ, GPD, LAND, LQR, LSIG, MTR, Parse, SIG, TYR, scrub_cosines,
};
use crate::config::LoaderConfig;
use crate::data::{
    Frame, LoadStage, Multiplicity, Nuclide, NuclideKind, Reaction, ReactionKind, XsSlice,
    is_fission_family, is_level_inelastic, superseding_partials, zai_from_za,
};
use crate::decode::table::AceTable;
use crate::error::{GraceError, Result};

//=====================================================================
// Turning a parsed table into a Nuclide and its reaction chain.
//
// The chain starts with elastic scattering, which the format stores
// apart from the numbered channels, then carries one record per MTR
// entry in table order. Channel order is load-bearing: the first nr
// channels are the secondary-neutron producers and line up with the
// angular locator table.
//
// Derived records come last: the synthesized any-level inelastic
// aggregate when only discrete levels are on the table, then the
// informational heat and photon production channels when the
// configuration asks for them.
//=====================================================================

impl AceTable {
    /// Decode the table into a freshly built Nuclide whose reactions
    /// live in `reactions`. Consumes the table; the payload moves into
    /// the Nuclide.
    pub fn decode(
        mut self,
        config: &LoaderConfig,
        reactions: &mut RecordArena<Reaction>,
    ) -> Result<Nuclide> {
        let (esz, mtr, lqr, tyr, sig, land, and, gpd) = {
            let arrays = self.arrays();
            let esz = required(ESZ::parse(&arrays, ())?, BlockType::ESZ)?;
            let mtr = MTR::parse(&arrays, ())?;
            let lqr = LQR::parse(&arrays, ())?;
            let tyr = TYR::parse(&arrays, &mtr)?;
            let lsig = LSIG::parse(&arrays, ())?;
            let sig = SIG::parse(&arrays, &lsig)?;
            let land = required(LAND::parse(&arrays, ())?, BlockType::LAND)?;
            let and = required(AND::parse(&arrays, ())?, BlockType::AND)?;
            let gpd = GPD::parse(&arrays, ())?;
            (esz, mtr, lqr, tyr, sig, land, and, gpd)
        };

        let clamped = scrub_cosines(&mut self.xxs, and.start, &land, &self.header.name)?;
        if clamped > 0 {
            log::debug!("{}: clamped {} angular cosines", self.header.name, clamped);
        }

        let name = &self.header.name;
        let xxs = &self.xxs;
        let num_energy_points = self.nxs.nes;
        let grid_e_min = xxs[esz.energy_start()];
        let grid_e_max = xxs[esz.energy_start() + num_energy_points - 1];

        // Elastic scattering heads the chain. Its cross section is the
        // fourth principal column and its angular table sits in slot 0
        // of the locator block. Emission is in the center-of-mass
        // frame by convention.
        let mut elastic = Reaction::new(2, ReactionKind::Partial, 0.0);
        elastic.multiplicity = Multiplicity::Fixed(1);
        elastic.frame = Frame::CenterOfMass;
        elastic.xs = Some(XsSlice {
            grid_index: 0,
            num_points: num_energy_points,
            xs_index: esz.elastic_start(),
            e_min: grid_e_min,
            e_max: grid_e_max,
        });
        elastic.angular_index = angular_offset(land.elastic(), and.start);
        let head = reactions.alloc(elastic);

        let mut fissile = false;
        let mut max_level_q: Option<f64> = None;
        let mut level_frame = Frame::CenterOfMass;
        let mut has_aggregate = false;

        if let (Some(mtr), Some(lqr), Some(tyr), Some(sig)) = (&mtr, &lqr, &tyr, &sig) {
            for i in 0..self.nxs.ntr {
                let mt = mtr[i];
                let mut reaction = Reaction::new(mt, ReactionKind::Partial, lqr[i]);
                reaction.multiplicity = tyr[i].multiplicity;
                reaction.frame = tyr[i].frame;

                if is_fission_family(mt) {
                    fissile = true;
                    // A known upstream defect leaves some fission
                    // channels with a plain multiplicity code.
                    if reaction.multiplicity != Multiplicity::EnergyDependent {
                        log::warn!(
                            "{}: MT {} multiplicity code is not energy-dependent, \
                             corrected to the fission convention",
                            name,
                            mt
                        );
                        reaction.multiplicity = Multiplicity::EnergyDependent;
                    }
                }

                if is_level_inelastic(mt) {
                    if max_level_q.is_none() {
                        level_frame = reaction.frame;
                    }
                    max_level_q = Some(max_level_q.map_or(lqr[i], |q: f64| q.max(lqr[i])));
                }
                has_aggregate |= mt == 4;

                let locator = sig[i];
                reaction.xs = Some(XsSlice {
                    grid_index: locator.grid_index,
                    num_points: locator.num_points,
                    xs_index: locator.xs_index,
                    e_min: xxs[esz.energy_start() + locator.grid_index],
                    e_max: xxs
                        [esz.energy_start() + locator.grid_index + locator.num_points - 1],
                });
                if let Some(locator) = land.channel(i) {
                    reaction.angular_index = angular_offset(locator, and.start);
                }

                reactions.append(head, reaction);
            }
        }

        // Tables that resolve inelastic scattering into discrete
        // levels usually drop the aggregate channel, but downstream
        // bookkeeping still wants a record for it.
        if let Some(q) = max_level_q {
            if !has_aggregate {
                let mut aggregate = Reaction::new(4, ReactionKind::Partial, q);
                aggregate.multiplicity = Multiplicity::Fixed(1);
                aggregate.frame = level_frame;
                reactions.append(head, aggregate);
                log::debug!("{}: synthesized the any-level inelastic aggregate", name);
            }
        }

        // A channel whose physics is covered by more specific partials
        // on the same table stays on the chain for lookups but must
        // never be sampled on top of them.
        let mts: Vec<i32> = reactions.iter(Some(head)).map(|h| reactions[h].mt).collect();
        let handles: Vec<_> = reactions.iter(Some(head)).collect();
        for handle in handles {
            if reactions[handle].kind != ReactionKind::Partial {
                continue;
            }
            if let Some(ranges) = superseding_partials(reactions[handle].mt) {
                let superseded = mts
                    .iter()
                    .any(|other| ranges.iter().any(|range| range.contains(other)));
                if superseded {
                    log::debug!(
                        "{}: MT {} is superseded by its partial channels, kept as informational",
                        name,
                        reactions[handle].mt
                    );
                    reactions[handle].kind = ReactionKind::Special;
                }
            }
        }

        if config.include_heat_production {
            let mut heat = Reaction::new(301, ReactionKind::Special, 0.0);
            heat.xs = Some(XsSlice {
                grid_index: 0,
                num_points: num_energy_points,
                xs_index: esz.heating_start(),
                e_min: grid_e_min,
                e_max: grid_e_max,
            });
            reactions.append(head, heat);
        }
        if config.include_photon_production {
            match &gpd {
                Some(gpd) => {
                    let mut photon = Reaction::new(202, ReactionKind::Special, 0.0);
                    photon.xs = Some(XsSlice {
                        grid_index: 0,
                        num_points: num_energy_points,
                        xs_index: gpd.start,
                        e_min: grid_e_min,
                        e_max: grid_e_max,
                    });
                    reactions.append(head, photon);
                }
                None => {
                    log::debug!("{}: photon production requested but the table carries none", name);
                }
            }
        }

        let AceTable { header, nxs, xxs, .. } = self;
        let kind = NuclideKind::from_table_name(&header.name, header.kT);
        Ok(Nuclide {
            name: header.name,
            alias: header.alias,
            zai: zai_from_za(nxs.za as i32, nxs.s as i32),
            atomic_weight_ratio: header.atomic_weight_ratio,
            kT: header.kT,
            temperature: header.temperature,
            kind,
            fissile,
            has_branch_data: false,
            doppler_broadened: header.kT > 0.0,
            payload: xxs,
            reactions: Some(head),
            transmute_slots: 0,
            stage: LoadStage::Decoded,
            energy_start: esz.energy_start(),
            num_energy_points,
        })
    }
}

fn required<T>(block: Option<T>, block_type: BlockType) -> Result<T> {
    block.ok_or_else(|| GraceError::format(format!("{} block absent", block_type)))
}

// A positive locator is a one-based offset into the angular block.
// Zero means isotropic with no stored table, negative means the
// distribution is provided elsewhere; neither leaves a pointer here.
fn angular_offset(locator: i64, and_start: usize) -> Option<usize> {
    if locator > 0 {
        Some(and_start + locator as usize - 1)
    } else {
        None
    }
}
