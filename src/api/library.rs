use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;

use crate::arena::{Handle, RecordArena};
use crate::branch::{
    apply_isomeric_branches, apply_secondary_branches, apply_yield_branches, finalize_graph,
};
use crate::config::LoaderConfig;
use crate::data::{BranchListEntry, FissionYield, LoadStage, Nuclide, Reaction};
use crate::decode::AceTable;
use crate::error::Result;
use crate::validate::validate_graph;

//=====================================================================
// Library: the owner of everything the loader produces.
//
// Both record arenas and every loaded nuclide live here. Collaborator
// data the library file itself does not carry (branch entries, decay
// modes, yield chains) is bundled into ExternalData up front; loading
// a nuclide then runs the whole pipeline in one call and hands back an
// index into the nuclide list. Once loaded, a nuclide is immutable and
// only reachable through shared borrows.
//=====================================================================

/// Collaborator data supplied alongside the library file.
#[derive(Debug, Default)]
pub struct ExternalData {
    /// Isomeric branch entries, covering any number of nuclides.
    pub branch_entries: Vec<BranchListEntry>,
    /// Chained secondary-emission codes keyed by MT.
    pub decay_modes: HashMap<i32, [i32; 5]>,
    /// Fission-yield chain heads keyed by MT.
    pub yield_chains: HashMap<i32, Handle<FissionYield>>,
}

pub struct Library {
    config: LoaderConfig,
    reactions: RecordArena<Reaction>,
    yields: RecordArena<FissionYield>,
    nuclides: Vec<Nuclide>,
}

impl Library {
    pub fn new(config: LoaderConfig) -> Self {
        let reactions = RecordArena::new(config.max_arena_records);
        let yields = RecordArena::new(config.max_arena_records);
        Library {
            config,
            reactions,
            yields,
            nuclides: Vec::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn nuclides(&self) -> &[Nuclide] {
        &self.nuclides
    }

    pub fn reactions(&self) -> &RecordArena<Reaction> {
        &self.reactions
    }

    pub fn yields(&self) -> &RecordArena<FissionYield> {
        &self.yields
    }

    /// Find a loaded nuclide by either of its identifiers.
    pub fn find(&self, target: &str) -> Option<&Nuclide> {
        self.nuclides
            .iter()
            .find(|n| n.name == target || n.alias.as_deref() == Some(target))
    }

    /// Thread a pre-sorted yield chain into the arena and return its
    /// head for the `ExternalData` map. An empty chain has no head.
    pub fn add_yield_chain(&mut self, entries: Vec<FissionYield>) -> Option<Handle<FissionYield>> {
        debug_assert!(
            entries.windows(2).all(|w| w[0].energy < w[1].energy),
            "yield chains must ascend in energy"
        );
        let mut entries = entries.into_iter();
        let head = self.yields.alloc(entries.next()?);
        for entry in entries {
            self.yields.append(head, entry);
        }
        Some(head)
    }

    /// Locate `target` in the library the reader is positioned on and
    /// run the full loading pipeline on it. Returns the index of the
    /// finished nuclide.
    pub fn load_nuclide(
        &mut self,
        reader: &mut BufReader<File>,
        target: &str,
        external: &ExternalData,
    ) -> Result<usize> {
        let table = AceTable::locate(reader, target)?;
        let mut nuclide = table.decode(&self.config, &mut self.reactions)?;
        self.stamp_decay_modes(&nuclide, &external.decay_modes);
        apply_isomeric_branches(
            &mut nuclide,
            &mut self.reactions,
            &external.branch_entries,
            &self.config,
        )?;
        apply_secondary_branches(&mut nuclide, &mut self.reactions, &self.config)?;
        apply_yield_branches(
            &mut nuclide,
            &mut self.reactions,
            &self.yields,
            &external.yield_chains,
            &self.config,
        )?;
        finalize_graph(&mut nuclide, &mut self.reactions)?;
        validate_graph(&mut nuclide, &self.reactions, &self.yields)?;
        nuclide.stage = LoadStage::Immutable;
        log::debug!("loaded {}", nuclide);
        self.nuclides.push(nuclide);
        Ok(self.nuclides.len() - 1)
    }

    /// Path-based entry point.
    pub fn load_nuclide_from_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        target: &str,
        external: &ExternalData,
    ) -> anyhow::Result<usize> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open library file {}", path.as_ref().display()))?;
        let mut reader = BufReader::new(file);
        let index = self
            .load_nuclide(&mut reader, target, external)
            .with_context(|| {
                format!("Failed to load {} from {}", target, path.as_ref().display())
            })?;
        Ok(index)
    }

    /// Decay modes attach per MT before the branching passes run, so
    /// only decoded primaries can receive them.
    fn stamp_decay_modes(&mut self, nuclide: &Nuclide, modes: &HashMap<i32, [i32; 5]>) {
        if modes.is_empty() {
            return;
        }
        let handles: Vec<Handle<Reaction>> = self.reactions.iter(nuclide.reactions).collect();
        for h in handles {
            if let Some(codes) = modes.get(&self.reactions[h].mt) {
                self.reactions[h].secondary_modes = *codes;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::data::{BranchRatio, ReactionKind};
    use crate::utils::testing::{
        TEST_LIBRARY_TEXT, create_reader_from_string, mt_count, write_library_file,
    };

    fn uranium_external(library: &mut Library) -> ExternalData {
        let chain = library
            .add_yield_chain(vec![
                FissionYield::new(2.53e-8, vec![(541350, 0.065)]),
                FissionYield::new(0.5, vec![(541350, 0.061)]),
                FissionYield::new(14.0, vec![(541350, 0.052)]),
            ])
            .unwrap();
        let mut external = ExternalData::default();
        external.yield_chains.insert(18, chain);
        external.branch_entries.push(BranchListEntry {
            zai: 922350,
            mt: 102,
            ratio: BranchRatio::Fixed(0.35),
        });
        external
    }

    #[test]
    fn test_load_runs_the_whole_pipeline() {
        let mut library = Library::new(LoaderConfig::default());
        let external = uranium_external(&mut library);
        let mut reader = create_reader_from_string(&TEST_LIBRARY_TEXT);

        let index = library
            .load_nuclide(&mut reader, "92235.00c", &external)
            .unwrap();

        assert_eq!(index, 0);
        let nuclide = &library.nuclides()[index];
        assert_eq!(nuclide.stage, LoadStage::Immutable);
        assert!(nuclide.fissile);
        assert!(nuclide.has_branch_data);
        // Fission: primary, two yield duplicates, the pseudo-reaction.
        assert_eq!(mt_count(library.reactions(), nuclide, 18), 4);
        // Capture: the isomeric pair.
        assert_eq!(mt_count(library.reactions(), nuclide, 102), 2);
        assert!(nuclide.transmute_slots > 0);
    }

    #[test]
    fn test_nuclides_share_the_arena_without_mixing_chains() {
        let mut library = Library::new(LoaderConfig::default());
        let external = ExternalData::default();

        let mut reader = create_reader_from_string(&TEST_LIBRARY_TEXT);
        let first = library
            .load_nuclide(&mut reader, "26056.00c", &external)
            .unwrap();
        let mut reader = create_reader_from_string(&TEST_LIBRARY_TEXT);
        let second = library
            .load_nuclide(&mut reader, "92235.00c", &external)
            .unwrap();
        assert_eq!((first, second), (0, 1));

        let chain_of = |index: usize| -> HashSet<_> {
            library
                .reactions()
                .iter(library.nuclides()[index].reactions)
                .collect()
        };
        assert!(chain_of(first).is_disjoint(&chain_of(second)));
    }

    #[test]
    fn test_find_by_identifier() {
        let mut library = Library::new(LoaderConfig::default());
        let mut reader = create_reader_from_string(&TEST_LIBRARY_TEXT);
        library
            .load_nuclide(&mut reader, "26056.00c", &ExternalData::default())
            .unwrap();

        assert!(library.find("26056.00c").is_some());
        assert!(library.find("92235.00c").is_none());
    }

    #[test]
    fn test_missing_target_reports_the_file() {
        let mut library = Library::new(LoaderConfig::default());
        let file = write_library_file(&TEST_LIBRARY_TEXT);

        let err = library
            .load_nuclide_from_path(file.path(), "11111.00c", &ExternalData::default())
            .unwrap_err();
        assert!(format!("{}", err).contains("Failed to load 11111.00c"));
    }

    #[test]
    fn test_add_yield_chain_threads_in_order() {
        let mut library = Library::new(LoaderConfig::default());
        let head = library
            .add_yield_chain(vec![
                FissionYield::new(2.53e-8, vec![]),
                FissionYield::new(1.0, vec![]),
            ])
            .unwrap();

        let energies: Vec<f64> = library
            .yields()
            .iter(Some(head))
            .map(|h| library.yields()[h].energy)
            .collect();
        assert_eq!(energies, vec![2.53e-8, 1.0]);

        assert!(library.add_yield_chain(Vec::new()).is_none());
    }

    #[test]
    fn test_decay_modes_reach_the_branching_pass() {
        let config = LoaderConfig {
            enable_secondary_branching: true,
            ..LoaderConfig::default()
        };
        let mut library = Library::new(config);
        let mut external = ExternalData::default();
        external.decay_modes.insert(102, [22, 0, 0, 0, 0]);
        let mut reader = create_reader_from_string(&TEST_LIBRARY_TEXT);

        let index = library
            .load_nuclide(&mut reader, "26056.00c", &external)
            .unwrap();

        let nuclide = &library.nuclides()[index];
        let reactions = library.reactions();
        let branch = reactions
            .iter(nuclide.reactions)
            .find(|&h| reactions[h].mt == 107)
            .unwrap();
        assert_eq!(reactions[branch].kind, ReactionKind::DecayBranch);
        // Fe-56 minus one neutron and one alpha is Cr-52.
        assert_eq!(reactions[branch].recoil_zai, 240520);
    }
}
