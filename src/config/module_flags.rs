use serde::{Deserialize, Serialize};

/// Per-integration enable switches.
///
/// Every flag defaults to `true`; a config file only needs to list the
/// parsers it wants to turn off. The prefetch flag covers whichever
/// prefetch variant the host platform uses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ModuleFlags {
    // execution
    pub amcache_parser: bool,
    pub app_compat_cache_parser: bool,
    pub prefetch_parser: bool,

    // ntfs
    pub mft_parser: bool,

    // events
    pub hayabusa_logon_parser: bool,
    pub hayabusa_timeline_parser: bool,
    pub chainsaw_parser: bool,
    pub evtx_parser: bool,
    pub ps_script_block_parser: bool,
    pub zircolite_parser: bool,

    // file
    pub jle_parser: bool,
    pub rb_parser: bool,
    pub sbe_parser: bool,
    pub wxt_parser: bool,
    pub recent_file_parser: bool,

    // registry
    pub registry_parser: bool,
    pub registry_asep_parser: bool,

    // sqldata
    pub sql_data_parser: bool,
}

impl Default for ModuleFlags {
    fn default() -> Self {
        Self::all(true)
    }
}

impl ModuleFlags {
    /// Every flag set to `enabled`
    pub fn all(enabled: bool) -> Self {
        ModuleFlags {
            amcache_parser: enabled,
            app_compat_cache_parser: enabled,
            prefetch_parser: enabled,
            mft_parser: enabled,
            hayabusa_logon_parser: enabled,
            hayabusa_timeline_parser: enabled,
            chainsaw_parser: enabled,
            evtx_parser: enabled,
            ps_script_block_parser: enabled,
            zircolite_parser: enabled,
            jle_parser: enabled,
            rb_parser: enabled,
            sbe_parser: enabled,
            wxt_parser: enabled,
            recent_file_parser: enabled,
            registry_parser: enabled,
            registry_asep_parser: enabled,
            sql_data_parser: enabled,
        }
    }

    /// Everything off, for building narrow catalogs
    pub fn none() -> Self {
        Self::all(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let flags = ModuleFlags::default();
        assert!(flags.amcache_parser);
        assert!(flags.mft_parser);
        assert!(flags.zircolite_parser);
        assert!(flags.sql_data_parser);
        assert_eq!(flags, ModuleFlags::all(true));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
chainsaw_parser: false
zircolite_parser: false
"#;

        let flags: ModuleFlags = serde_yaml::from_str(yaml).unwrap();
        assert!(!flags.chainsaw_parser);
        assert!(!flags.zircolite_parser);
        assert!(flags.hayabusa_logon_parser); // Untouched flags stay on
        assert!(flags.registry_parser);
    }

    #[test]
    fn test_none_disables_everything() {
        let flags = ModuleFlags::none();
        let yaml = serde_yaml::to_string(&flags).unwrap();
        assert!(!yaml.contains("true"));
    }
}
