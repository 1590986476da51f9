//! Wavefront OBJ reader.
//!
//! Handles `v`, `vt`, `vn` and `f` records. Faces are fan-triangulated and
//! every face corner becomes its own vertex. Other records (`o`, `g`, `s`,
//! `usemtl`, `mtllib`, ...) are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use tracing::{debug, info};

use crate::error::{current_dir_or_dot, MeshError};
use crate::utils::{Mesh, Vertex};

/// One face corner: position index plus optional uv and normal indices (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

/// Load an OBJ file from disk. `color` is applied to every vertex.
pub fn load_obj(path: &Path, color: [f32; 3]) -> Result<Mesh, MeshError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            MeshError::NotFound { path: path.to_path_buf(), cwd: current_dir_or_dot() }
        } else {
            MeshError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let mesh = parse_obj(BufReader::new(file), color).map_err(|err| match err {
        MeshError::Io { source, .. } => MeshError::Io { path: path.to_path_buf(), source },
        other => other,
    })?;
    if mesh.indices.is_empty() {
        return Err(MeshError::Empty { path: path.to_path_buf() });
    }

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "Loaded OBJ mesh"
    );
    Ok(mesh)
}

/// Parse OBJ text from any reader
pub fn parse_obj<R: BufRead>(reader: R, color: [f32; 3]) -> Result<Mesh, MeshError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut mesh = Mesh::empty();
    let color = [color[0], color[1], color[2], 1.0];

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| MeshError::Io { path: Default::default(), source })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else { continue };
        let args: Vec<&str> = parts.collect();

        match tag {
            "v" => positions.push(parse_floats::<3>(&args, line_no)?),
            "vt" => {
                // w is optional and ignored
                let [u, v] = parse_floats::<2>(&args, line_no)?;
                tex_coords.push([u, 1.0 - v]);
            }
            "vn" => normals.push(parse_floats::<3>(&args, line_no)?),
            "f" => {
                if args.len() < 3 {
                    return Err(parse_error(line_no, format!("face needs at least 3 vertices, got {}", args.len())));
                }
                let corners = args
                    .iter()
                    .map(|a| parse_corner(a, positions.len(), tex_coords.len(), normals.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;

                for i in 1..corners.len() - 1 {
                    push_triangle(
                        &mut mesh,
                        [corners[0], corners[i], corners[i + 1]],
                        &positions,
                        &tex_coords,
                        &normals,
                        color,
                    );
                }
            }
            _ => {}
        }
    }

    debug!(positions = positions.len(), uvs = tex_coords.len(), normals = normals.len(), "Parsed OBJ records");
    Ok(mesh)
}

fn push_triangle(
    mesh: &mut Mesh,
    tri: [Corner; 3],
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    color: [f32; 4],
) {
    let p = tri.map(|c| Vec3::from_array(positions[c.v]));
    // Flat normal for corners that carry none
    let face_normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero().to_array();

    for corner in tri {
        let base = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            pos: positions[corner.v],
            normal: corner.vn.map_or(face_normal, |n| normals[n]),
            color,
            uv: corner.vt.map_or([0.0, 0.0], |t| tex_coords[t]),
        });
        mesh.indices.push(base);
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize) -> Result<[f32; N], MeshError> {
    if args.len() < N {
        return Err(parse_error(line, format!("expected {N} numbers, got {}", args.len())));
    }
    let mut out = [0.0; N];
    for (slot, raw) in out.iter_mut().zip(args) {
        *slot = raw
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number '{raw}'")))?;
    }
    Ok(out)
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_corner(raw: &str, n_pos: usize, n_uv: usize, n_norm: usize, line: usize) -> Result<Corner, MeshError> {
    let mut fields = raw.split('/');
    let v = match fields.next() {
        Some(f) if !f.is_empty() => resolve_index(f, n_pos, line)?,
        _ => return Err(parse_error(line, format!("face corner '{raw}' has no position index"))),
    };
    let vt = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, n_uv, line)?),
        _ => None,
    };
    let vn = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, n_norm, line)?),
        _ => None,
    };
    Ok(Corner { v, vt, vn })
}

/// OBJ indices are 1-based; negative ones count back from the latest record
fn resolve_index(raw: &str, len: usize, line: usize) -> Result<usize, MeshError> {
    let idx: i64 = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{raw}'")))?;
    let resolved = match idx {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => return Err(parse_error(line, "index 0 is not valid in OBJ".to_string())),
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(parse_error(line, format!("index {idx} out of range (have {len})")));
    }
    Ok(resolved as usize)
}

fn parse_error(line: usize, message: String) -> MeshError {
    MeshError::Parse { line, message }
}
