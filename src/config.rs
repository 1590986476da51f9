//! Compile-time tunables and the startup surface (command line + prompts).

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use crate::error::ViewerError;

pub const WINDOW_TITLE: &str = "Reading a *.obj file";
pub const WINDOW_WIDTH: u32 = 1200;
pub const WINDOW_HEIGHT: u32 = 800;

// Projection
pub const FOV_Y_DEGREES: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

// Camera
pub const MOUSE_SENSITIVITY: f32 = 1.0;
pub const INITIAL_AZIMUTH: f32 = 0.0;
pub const INITIAL_POLAR: f32 = std::f32::consts::FRAC_PI_2;
pub const POLAR_FLOOR: f32 = 0.01;
pub const POLAR_CEILING: f32 = std::f32::consts::PI - 0.00001;

// Viewer
pub const INITIAL_EYE: [f32; 3] = [0.0, 0.0, 2.0];
pub const EYE_HEIGHT: f32 = 0.8;
pub const MOVE_SPEED: f32 = 10.0;
pub const RISE_RATE: f32 = 2.0;
pub const LOGICAL_RATE: f32 = 2.0;

// Toggles
pub const INITIAL_OBJECT_SCALE: f32 = 1.0;
pub const SCALE_STEP: f32 = 0.01;

// Model placement
pub const MODEL_OFFSET: [f32; 3] = [1.5, -0.25, 0.0];

// Lighting (light intensities and material reflectances)
pub const LIGHT_AMBIENT: [f32; 3] = [0.6, 0.6, 0.6];
pub const LIGHT_DIFFUSE: [f32; 3] = [0.6, 0.6, 0.6];
pub const LIGHT_SPECULAR: [f32; 3] = [0.7, 0.7, 0.7];
pub const MATERIAL_AMBIENT: [f32; 3] = [0.6, 0.6, 0.6];
pub const MATERIAL_DIFFUSE: [f32; 3] = [0.5, 0.5, 0.5];
pub const MATERIAL_SPECULAR: [f32; 3] = [0.7, 0.7, 0.7];
pub const SHININESS: f32 = 1000.0;
pub const CONSTANT_ATTENUATION: f32 = 0.001;
pub const LINEAR_ATTENUATION: f32 = 0.001;
pub const QUADRATIC_ATTENUATION: f32 = 0.0011;

pub const CLEAR_COLOR: [f64; 4] = [0.85, 0.85, 0.85, 1.0];
pub const FLAT_MESH_COLOR: [f32; 3] = [0.9, 0.6, 0.2];

/// Command line for the viewer. Anything missing is asked for on stdin.
#[derive(Debug, Default, Parser)]
#[command(name = "objwalk", version, about = "Walk around a Wavefront OBJ model")]
pub struct LaunchOptions {
    /// OBJ file to load (".obj" is appended when missing)
    pub mesh: Option<PathBuf>,

    /// PNG texture to apply (".png" is appended when missing)
    #[arg(short, long, conflicts_with = "no_texture")]
    pub texture: Option<PathBuf>,

    /// Render with the flat mesh color and skip the texture prompt
    #[arg(long)]
    pub no_texture: bool,
}

/// Fully resolved startup parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub mesh_path: PathBuf,
    pub texture_path: Option<PathBuf>,
}

impl LaunchOptions {
    /// Fill the gaps left on the command line by prompting on `input`/`output`.
    ///
    /// A mesh given on the command line without any texture flag means
    /// "no texture", so scripted launches never block on stdin.
    pub fn resolve<R: BufRead, W: Write>(
        self,
        input: &mut R,
        output: &mut W,
    ) -> Result<ViewerConfig, ViewerError> {
        let use_texture = match (&self.texture, self.no_texture, &self.mesh) {
            (Some(_), _, _) => true,
            (None, true, _) => false,
            (None, false, Some(_)) => false,
            (None, false, None) => ask_yes_no(input, output, "Use texture? (yes/no): ")?,
        };

        let mesh = match self.mesh {
            Some(mesh) => mesh,
            None => PathBuf::from(ask_line(input, output, "Enter the name of an obj file: ")?),
        };
        let mesh_path = with_extension_if_missing(&mesh, "obj");

        let texture_path = match (use_texture, self.texture) {
            (false, _) => None,
            (true, Some(texture)) => Some(with_extension_if_missing(&texture, "png")),
            (true, None) => {
                let name = ask_line(input, output, "Please enter a png file: ")?;
                Some(with_extension_if_missing(Path::new(&name), "png"))
            }
        };

        info!(mesh = %mesh_path.display(), texture = ?texture_path, "Resolved viewer configuration");
        Ok(ViewerConfig { mesh_path, texture_path })
    }
}

/// Append `.{ext}` unless the path already ends with that extension (case-insensitive).
pub fn with_extension_if_missing(path: &Path, ext: &str) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }
}

fn ask_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String, ViewerError> {
    loop {
        write!(output, "{question}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ViewerError::PromptClosed);
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool, ViewerError> {
    loop {
        let answer = ask_line(input, output, question)?;
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" | "1" => return Ok(true),
            "n" | "no" | "0" => return Ok(false),
            _ => writeln!(output, "Please answer yes or no.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn resolve_with(options: LaunchOptions, stdin: &str) -> (Result<ViewerConfig, ViewerError>, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = options.resolve(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_extension_is_appended_once() {
        assert_eq!(with_extension_if_missing(Path::new("house"), "obj"), PathBuf::from("house.obj"));
        assert_eq!(with_extension_if_missing(Path::new("house.obj"), "obj"), PathBuf::from("house.obj"));
        assert_eq!(with_extension_if_missing(Path::new("HOUSE.OBJ"), "obj"), PathBuf::from("HOUSE.OBJ"));
        assert_eq!(with_extension_if_missing(Path::new("bricks"), "png"), PathBuf::from("bricks.png"));
    }

    #[test]
    fn test_prompts_for_everything_without_arguments() {
        let (result, transcript) = resolve_with(LaunchOptions::default(), "yes\nbuilding\nwall\n");
        let config = result.unwrap();
        assert_eq!(config.mesh_path, PathBuf::from("building.obj"));
        assert_eq!(config.texture_path, Some(PathBuf::from("wall.png")));
        assert!(transcript.contains("Use texture?"));
        assert!(transcript.contains("png file"));
    }

    #[test]
    fn test_no_texture_answer_skips_texture_prompt() {
        let (result, transcript) = resolve_with(LaunchOptions::default(), "0\nbuilding.obj\n");
        let config = result.unwrap();
        assert_eq!(config.mesh_path, PathBuf::from("building.obj"));
        assert_eq!(config.texture_path, None);
        assert!(!transcript.contains("png file"));
    }

    #[test]
    fn test_invalid_answer_is_asked_again() {
        let (result, transcript) = resolve_with(LaunchOptions::default(), "maybe\n\nn\nmodel\n");
        assert_eq!(result.unwrap().texture_path, None);
        assert!(transcript.contains("Please answer yes or no."));
    }

    #[test]
    fn test_mesh_argument_alone_never_prompts() {
        let options = LaunchOptions { mesh: Some(PathBuf::from("tower")), ..Default::default() };
        let (result, transcript) = resolve_with(options, "");
        assert_eq!(result.unwrap().mesh_path, PathBuf::from("tower.obj"));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_texture_argument_prompts_only_for_mesh() {
        let options = LaunchOptions { texture: Some(PathBuf::from("stone")), ..Default::default() };
        let (result, transcript) = resolve_with(options, "tower\n");
        let config = result.unwrap();
        assert_eq!(config.texture_path, Some(PathBuf::from("stone.png")));
        assert!(!transcript.contains("Use texture?"));
    }

    #[test]
    fn test_closed_stdin_is_an_error() {
        let (result, _) = resolve_with(LaunchOptions::default(), "");
        assert!(matches!(result, Err(ViewerError::PromptClosed)));
    }
}
