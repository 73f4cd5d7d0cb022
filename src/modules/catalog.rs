use std::collections::HashSet;

use log::info;

use super::{events, execution, file, ntfs, registry, sqldata, ModuleDescriptor};
use crate::config::{ModuleFlags, Platform};
use crate::error::ParserError;

/// Category name plus its `(enabled, descriptor)` pairs, in declaration order
pub type CategoryTable = Vec<(&'static str, Vec<(bool, ModuleDescriptor)>)>;

/// A named group of modules sharing one output subdirectory.
#[derive(Debug, Clone)]
pub struct ModuleCategory {
    pub name: String,
    pub modules: Vec<ModuleDescriptor>,
}

/// The active modules for this run, grouped by category.
///
/// Built once at startup and read-only afterwards. Disabled modules never
/// make it in.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    categories: Vec<ModuleCategory>,
}

/// The prefetch integration for `platform`: the CSV script on Linux, PECmd on Windows
pub(crate) fn prefetch_descriptor(platform: Platform) -> ModuleDescriptor {
    match platform {
        Platform::Linux => ModuleDescriptor::new(
            execution::PREFETCH_RUN_COUNTS,
            execution::prefetch_run_counts,
        ),
        Platform::Windows => ModuleDescriptor::new(execution::PECMD, execution::pecmd),
    }
}

/// The six fixed categories and their modules, each paired with its enable flag
pub(crate) fn category_table(flags: &ModuleFlags, platform: Platform) -> CategoryTable {
    vec![
        (
            "execution",
            vec![
                (
                    flags.amcache_parser,
                    ModuleDescriptor::new(execution::AMCACHE_PARSER, execution::amcache_parser),
                ),
                (
                    flags.app_compat_cache_parser,
                    ModuleDescriptor::new(
                        execution::APP_COMPAT_CACHE_PARSER,
                        execution::app_compat_cache_parser,
                    ),
                ),
                (flags.prefetch_parser, prefetch_descriptor(platform)),
            ],
        ),
        (
            "ntfs",
            vec![(
                flags.mft_parser,
                ModuleDescriptor::new(ntfs::MFTECMD, ntfs::mftecmd),
            )],
        ),
        (
            "events",
            vec![
                (
                    flags.hayabusa_logon_parser,
                    ModuleDescriptor::new(events::HAYABUSA_LOGON, events::hayabusa_logon),
                ),
                (
                    flags.hayabusa_timeline_parser,
                    ModuleDescriptor::new(events::HAYABUSA_TIMELINE, events::hayabusa_timeline),
                ),
                (
                    flags.chainsaw_parser,
                    ModuleDescriptor::new(events::CHAINSAW, events::chainsaw),
                ),
                (
                    flags.evtx_parser,
                    ModuleDescriptor::new(events::EVTXECMD, events::evtxecmd),
                ),
                (
                    flags.ps_script_block_parser,
                    ModuleDescriptor::new(
                        events::SCRIPT_BLOCK_POWERSHELL,
                        events::script_block_powershell,
                    ),
                ),
                (
                    flags.zircolite_parser,
                    ModuleDescriptor::new(events::ZIRCOLITE, events::zircolite),
                ),
            ],
        ),
        (
            "file",
            vec![
                (flags.jle_parser, ModuleDescriptor::new(file::JLECMD, file::jlecmd)),
                (flags.rb_parser, ModuleDescriptor::new(file::RBCMD, file::rbcmd)),
                (flags.sbe_parser, ModuleDescriptor::new(file::SBECMD, file::sbecmd)),
                (flags.wxt_parser, ModuleDescriptor::new(file::WXTCMD, file::wxtcmd)),
                (
                    flags.recent_file_parser,
                    ModuleDescriptor::new(
                        file::RECENT_FILE_CACHE_PARSER,
                        file::recent_file_cache_parser,
                    ),
                ),
            ],
        ),
        (
            "registry",
            vec![
                (
                    flags.registry_parser,
                    ModuleDescriptor::new(registry::RECMD, registry::recmd),
                ),
                (
                    flags.registry_asep_parser,
                    ModuleDescriptor::new(registry::RECMD_ASEP, registry::recmd_asep),
                ),
            ],
        ),
        (
            "sqldata",
            vec![(
                flags.sql_data_parser,
                ModuleDescriptor::new(sqldata::SQLECMD, sqldata::sqlecmd),
            )],
        ),
    ]
}

impl ModuleCatalog {
    /// Build the active catalog from the enable flags.
    pub fn build(flags: &ModuleFlags, platform: Platform) -> Result<Self, ParserError> {
        Self::from_table(category_table(flags, platform))
    }

    /// Drop disabled modules and reject duplicate identifiers.
    ///
    /// Categories left without modules are kept so their output directory
    /// still appears.
    pub fn from_table(table: CategoryTable) -> Result<Self, ParserError> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(table.len());

        for (name, pairs) in table {
            let mut modules = Vec::new();
            for (enabled, descriptor) in pairs {
                if !enabled {
                    continue;
                }
                if !seen.insert(descriptor.identifier.clone()) {
                    return Err(ParserError::DuplicateModule(descriptor.identifier));
                }
                modules.push(descriptor);
            }
            categories.push(ModuleCategory {
                name: name.to_string(),
                modules,
            });
        }

        Ok(ModuleCatalog { categories })
    }

    pub fn categories(&self) -> &[ModuleCategory] {
        &self.categories
    }

    /// Active identifiers in category order, for display
    pub fn identifiers(&self) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|c| c.modules.iter().map(|m| m.identifier.as_str()))
            .collect()
    }

    pub fn module_count(&self) -> usize {
        self.categories.iter().map(|c| c.modules.len()).sum()
    }

    pub fn log_active(&self) {
        info!(
            "using {} modules from config: \n\t{}",
            self.module_count(),
            self.identifiers().join("\n\t")
        );
    }
}
