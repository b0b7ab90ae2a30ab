use const_format::formatcp;

pub const TABLEAU: &str = "tableau";
pub const SCENE_EXT: &str = ".tbl";

pub const PATH_SEPARATOR: &str = ":";
pub const ROOT_PATH: &str = "()";

pub const DEFAULT_LOG_FILTER: &str = formatcp!("info,{TABLEAU}=info");
pub const VERBOSE_LOG_FILTER: &str = formatcp!("info,{TABLEAU}=debug");
