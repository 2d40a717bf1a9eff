//! Font lookup for the PDF surface.
//!
//! Roboto is searched for in `DUPLICATA_FONTS_DIR`, then in `assets/fonts`
//! next to the running executable, then in the crate's own `assets/fonts`.
//! If no directory holds all four faces, the Arial faces are taken from
//! `DUPLICATA_WINDOWS_FONTS_DIR` or the Windows font directory.

use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable pointing at a directory with the Roboto files.
pub const FONTS_DIR_ENV: &str = "DUPLICATA_FONTS_DIR";

/// Environment variable pointing at a directory with the Arial fallback files.
pub const WINDOWS_FONTS_DIR_ENV: &str = "DUPLICATA_WINDOWS_FONTS_DIR";

const FALLBACK_FAMILY_NAME: &str = "Arial";

/// Regular, bold, italic and bold italic faces, in that order.
type Faces = [&'static str; 4];

const ROBOTO_FACES: Faces = [
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const ARIAL_FACES: Faces = ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"];

/// Where the loaded font family came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// The Roboto family found in the given directory.
    Bundled(PathBuf),
    /// The Arial family found in the given directory.
    WindowsFallback(PathBuf),
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (family, dir) = match self {
            Self::Bundled(dir) => (DEFAULT_FONT_FAMILY_NAME, dir),
            Self::WindowsFallback(dir) => (FALLBACK_FAMILY_NAME, dir),
        };
        write!(f, "{} from {}", family, dir.display())
    }
}

/// Directory inside the crate that holds the bundled fonts.
pub fn bundled_fonts_source_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("fonts")
}

/// Why a searched directory was rejected.
#[derive(Debug)]
enum Rejection {
    NoDirectory(PathBuf),
    MissingFaces(PathBuf, Vec<&'static str>),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDirectory(dir) => write!(f, "{} does not exist", dir.display()),
            Self::MissingFaces(dir, faces) => {
                write!(f, "{} lacks {}", dir.display(), faces.join(", "))
            }
        }
    }
}

fn non_empty_env(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn roboto_dirs() -> Vec<PathBuf> {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets").join("fonts")));

    let mut dirs: Vec<PathBuf> = Vec::with_capacity(3);
    for dir in non_empty_env(FONTS_DIR_ENV)
        .into_iter()
        .chain(beside_exe)
        .chain(Some(bundled_fonts_source_dir()))
    {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

fn arial_dirs() -> Vec<PathBuf> {
    let system = ["WINDIR", "SystemRoot"]
        .into_iter()
        .filter(|_| cfg!(windows))
        .filter_map(non_empty_env)
        .map(|root| root.join("Fonts"));
    non_empty_env(WINDOWS_FONTS_DIR_ENV)
        .into_iter()
        .chain(system)
        .collect()
}

fn missing_faces(dir: &Path, faces: &Faces) -> Vec<&'static str> {
    faces
        .iter()
        .copied()
        .filter(|face| !dir.join(face).is_file())
        .collect()
}

/// Returns the first directory holding every face, or why each one was rejected.
fn locate(dirs: Vec<PathBuf>, faces: &Faces) -> Result<PathBuf, Vec<Rejection>> {
    let mut rejections = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if !dir.is_dir() {
            rejections.push(Rejection::NoDirectory(dir));
            continue;
        }
        let missing = missing_faces(&dir, faces);
        if missing.is_empty() {
            return Ok(dir);
        }
        rejections.push(Rejection::MissingFaces(dir, missing));
    }
    Err(rejections)
}

fn describe(rejections: &[Rejection]) -> String {
    if rejections.is_empty() {
        return "no directory to search".to_owned();
    }
    rejections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn not_found(message: String) -> Error {
    Error::new(
        message,
        io::Error::new(io::ErrorKind::NotFound, "fonts not found"),
    )
}

fn load_arial(dir: &Path) -> Result<FontFamily<FontData>, Error> {
    let load = |face: &str| {
        let path = dir.join(face);
        FontData::load(&path, None).map_err(|err| {
            Error::new(
                format!("cannot read {}: {}", path.display(), err),
                io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
            )
        })
    };
    let [regular, bold, italic, bold_italic] = ARIAL_FACES;
    Ok(FontFamily {
        regular: load(regular)?,
        bold: load(bold)?,
        italic: load(italic)?,
        bold_italic: load(bold_italic)?,
    })
}

/// Loads Roboto, or Arial when no Roboto directory is complete, and reports
/// which one was used.
///
/// A complete directory whose files cannot be parsed is an error; the
/// fallback only covers fonts that are absent.
pub fn load_font_family() -> Result<(FontFamily<FontData>, FontSource), Error> {
    let roboto = match locate(roboto_dirs(), &ROBOTO_FACES) {
        Ok(dir) => {
            debug!("Loading {} from {}", DEFAULT_FONT_FAMILY_NAME, dir.display());
            let family = fonts::from_files(&dir, DEFAULT_FONT_FAMILY_NAME, None)?;
            return Ok((family, FontSource::Bundled(dir)));
        }
        Err(rejections) => describe(&rejections),
    };

    match locate(arial_dirs(), &ARIAL_FACES) {
        Ok(dir) => {
            let family = load_arial(&dir)?;
            let source = FontSource::WindowsFallback(dir);
            warn!("{} not found ({}); using {}", DEFAULT_FONT_FAMILY_NAME, roboto, source);
            Ok((family, source))
        }
        Err(rejections) => Err(not_found(format!(
            "{} not found ({}) and no {} fallback ({}). Set {} to a directory with the {} files.",
            DEFAULT_FONT_FAMILY_NAME,
            roboto,
            FALLBACK_FAMILY_NAME,
            describe(&rejections),
            FONTS_DIR_ENV,
            DEFAULT_FONT_FAMILY_NAME
        ))),
    }
}

/// Returns the font family used for rendering, see [`load_font_family`].
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    load_font_family().map(|(family, _)| family)
}

/// Whether a complete Roboto directory can be found.
pub fn default_fonts_available() -> bool {
    locate(roboto_dirs(), &ROBOTO_FACES).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_every_missing_face() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ROBOTO_FACES[0]), b"").unwrap();

        let missing = missing_faces(dir.path(), &ROBOTO_FACES);
        assert_eq!(missing, ROBOTO_FACES[1..].to_vec());
    }

    #[test]
    fn picks_the_first_complete_directory() {
        let incomplete = tempfile::tempdir().unwrap();
        let complete = tempfile::tempdir().unwrap();
        for face in ARIAL_FACES {
            std::fs::write(complete.path().join(face), b"").unwrap();
        }
        let absent = incomplete.path().join("nope");

        let dirs = vec![
            absent.clone(),
            incomplete.path().to_path_buf(),
            complete.path().to_path_buf(),
        ];
        assert_eq!(locate(dirs, &ARIAL_FACES).unwrap(), complete.path());

        let rejections = locate(vec![absent], &ARIAL_FACES).unwrap_err();
        assert!(matches!(rejections[..], [Rejection::NoDirectory(_)]));
        assert!(describe(&rejections).contains("does not exist"));
    }
}
