use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Prefix that marks a system-wide installation.
pub const INSTALL_PREFIX: &str = "/usr/local";

/// Where installed templates live.
pub const INSTALLED_TEMPLATES_DIR: &str = "/usr/local/share/archiplex/templates";

/// Where new experiments and the templates they are built from live on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub experiments_root: PathBuf,
  pub templates_dir: PathBuf,
}

impl Layout {
  /// Resolves the layout from the running executable's path.
  ///
  /// - Installed under [`INSTALL_PREFIX`]: experiments go to `$HOME/experiments`.
  /// - Anywhere else (a development checkout): experiments go to
  ///   `../../experiments` and templates are read from `../../templates`,
  ///   both relative to the executable's directory.
  ///
  /// This is path arithmetic only; nothing is created or checked on disk.
  pub fn resolve(exe: &Path, home: Option<&Path>) -> Self {
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("/"));
    let dev_root = normalize(&exe_dir.join("..").join(".."));

    match home {
      Some(home) if exe.starts_with(INSTALL_PREFIX) => Layout {
        experiments_root: home.join("experiments"),
        templates_dir: PathBuf::from(INSTALLED_TEMPLATES_DIR),
      },
      _ => Layout {
        experiments_root: dev_root.join("experiments"),
        templates_dir: dev_root.join("templates"),
      },
    }
  }

  /// Resolves the layout for the current process.
  pub fn current() -> Self {
    let exe = std::env::current_exe()
      .map(|p| absolutize(&p))
      .unwrap_or_else(|_| absolutize(Path::new(".")));
    let home = std::env::var_os("HOME").map(PathBuf::from);
    Layout::resolve(&exe, home.as_deref())
  }
}

/// Makes `path` absolute against the current directory, without touching the file.
pub fn absolutize(path: &Path) -> PathBuf {
  if path.is_absolute() {
    normalize(path)
  } else {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    normalize(&cwd.join(path))
  }
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push(component);
        }
      }
      other => out.push(other),
    }
  }
  out
}

/// Renders `path` relative to the current directory when that is shorter to read.
pub fn display_relative(path: &Path) -> String {
  std::env::current_dir()
    .ok()
    .and_then(|cwd| pathdiff::diff_paths(path, cwd))
    .filter(|rel| !rel.as_os_str().is_empty())
    .unwrap_or_else(|| path.to_path_buf())
    .display()
    .to_string()
}
