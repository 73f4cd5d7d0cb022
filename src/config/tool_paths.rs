use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host platforms with a known tool install layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// Where every external parser lives.
///
/// Built once at startup and handed to modules by reference. Binary entries
/// are command strings: a bare name resolved through `PATH`, an absolute
/// path, or an interpreter line such as `python3 'script.py'`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub amcache_parser: String,
    pub app_compat_cache_parser: String,
    pub pecmd: String,
    pub prefetchruncounts: String,
    pub jlecmd: String,
    pub rbcmd: String,
    pub sbecmd: String,
    pub wxtcmd: String,
    pub recent_file_cache_parser: String,
    pub recmd: String,
    pub sqlecmd: String,
    pub mftecmd: String,
    pub evtxecmd: String,
    pub hayabusa: String,
    pub chainsaw: String,
    pub zircolite: String,
    pub script_block: String,
    pub zircolite_evtx_dump: String,

    /// Eric Zimmerman tools home, holds `RECmd/BatchExamples`
    pub eztool_dir: PathBuf,
    pub hayabusa_dir: PathBuf,
    pub chainsaw_dir: PathBuf,
    pub zircolite_dir: PathBuf,
}

impl ToolConfig {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Linux => Self::linux(),
            Platform::Windows => Self::windows(),
        }
    }

    /// Tools installed on `PATH`, supporting data under `/opt`
    pub fn linux() -> Self {
        ToolConfig {
            amcache_parser: "AmcacheParser".to_string(),
            app_compat_cache_parser: "AppCompatCacheParser".to_string(),
            pecmd: "PECmd".to_string(),
            prefetchruncounts: "prefetchruncounts".to_string(),
            jlecmd: "JLECmd".to_string(),
            rbcmd: "RBCmd".to_string(),
            sbecmd: "SBECmd".to_string(),
            wxtcmd: "WxTCmd".to_string(),
            recent_file_cache_parser: "RecentFileCacheParser".to_string(),
            recmd: "RECmd".to_string(),
            sqlecmd: "SQLECmd".to_string(),
            mftecmd: "MFTECmd".to_string(),
            evtxecmd: "EvtxECmd".to_string(),
            hayabusa: "hayabusa".to_string(),
            chainsaw: "chainsaw".to_string(),
            zircolite: "zircolite".to_string(),
            script_block: "script_block_extract".to_string(),
            zircolite_evtx_dump: "/opt/Zircolite/bin/evtx_dump_lin".to_string(),
            eztool_dir: PathBuf::from("/opt/eztool/net9"),
            hayabusa_dir: PathBuf::from("/opt/hayabusa"),
            chainsaw_dir: PathBuf::from("/opt/chainsaw"),
            zircolite_dir: PathBuf::from("/opt/Zircolite"),
        }
    }

    /// Analyst workstation layout under `D:\Tools`
    pub fn windows() -> Self {
        let ez = r"D:\Tools\Get-ZimmermanTools";
        ToolConfig {
            amcache_parser: format!(r"{ez}\AmcacheParser.exe"),
            app_compat_cache_parser: format!(r"{ez}\AppCompatCacheParser.exe"),
            pecmd: format!(r"{ez}\PECmd.exe"),
            prefetchruncounts: format!(r"python3 '{ez}\prefetchruncounts.py'"),
            jlecmd: format!(r"{ez}\JLECmd.exe"),
            rbcmd: format!(r"{ez}\RBCmd.exe"),
            sbecmd: format!(r"{ez}\SBECmd.exe"),
            wxtcmd: format!(r"{ez}\WxTCmd.exe"),
            recent_file_cache_parser: format!(r"{ez}\RecentFileCacheParser.exe"),
            recmd: format!(r"{ez}\RECmd\RECmd.exe"),
            sqlecmd: format!(r"{ez}\SQLECmd.exe"),
            mftecmd: format!(r"{ez}\MFTECmd.exe"),
            evtxecmd: format!(r"{ez}\EvtxEcmd.exe"),
            hayabusa: format!(r"{ez}\hayabusa.exe"),
            chainsaw: format!(r"{ez}\chainsaw.exe"),
            zircolite: format!(r"{ez}\zircolite.exe"),
            script_block: format!(r"{ez}\script_block_bin.exe"),
            zircolite_evtx_dump: r"D:\Tools\Zircolite\bin\evtx_dump_win.exe".to_string(),
            eztool_dir: PathBuf::from(ez),
            hayabusa_dir: PathBuf::from(r"D:\Tools\hayabusa"),
            chainsaw_dir: PathBuf::from(r"D:\Tools\chainsaw"),
            zircolite_dir: PathBuf::from(r"D:\Tools\zircolite"),
        }
    }
}
