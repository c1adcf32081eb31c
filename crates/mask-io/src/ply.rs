//! Attributed PLY writing and loading.
//!
//! PLY is the attributed export representation: along with positions and
//! normals it stores a per-face `label` integer property, so downstream
//! consumers can recover which segmentation label produced every triangle.
//!
//! The writer emits binary little-endian directly; ply-rs mis-writes binary
//! list properties (it uses the element count as the list length), so only
//! the parser side goes through ply-rs.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use mask_types::{SurfaceMesh, Vector3, Vertex};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{IoError, IoResult};

/// Save a surface as binary little-endian PLY with a per-face `label`
/// property.
///
/// An untagged mesh is written with label 0 on every face.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
// f64 -> f32 narrowing matches the PLY float properties; indices fit i32
pub fn save_ply<P: AsRef<Path>>(mesh: &SurfaceMesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by maskmesh")?;
    writeln!(writer, "element vertex {}", mesh.vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property float nx")?;
    writeln!(writer, "property float ny")?;
    writeln!(writer, "property float nz")?;
    writeln!(writer, "element face {}", mesh.faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "property int label")?;
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        let n = v.normal.unwrap_or_else(Vector3::zeros);
        for value in [
            v.position.x,
            v.position.y,
            v.position.z,
            n.x,
            n.y,
            n.z,
        ] {
            writer.write_all(&(value as f32).to_le_bytes())?;
        }
    }

    for (face_index, &[i0, i1, i2]) in mesh.faces.iter().enumerate() {
        let label = mesh.face_labels.get(face_index).copied().unwrap_or(0);
        writer.write_all(&[3_u8])?;
        for index in [i0, i1, i2] {
            writer.write_all(&(index as i32).to_le_bytes())?;
        }
        writer.write_all(&label.to_le_bytes())?;
    }

    Ok(())
}

/// Load a PLY surface, recovering positions, normals, faces, and per-face
/// labels when present.
///
/// # Errors
///
/// Returns an error if the file is missing or not valid PLY.
#[allow(clippy::cast_possible_truncation)]
pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<SurfaceMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = SurfaceMesh::new();

    if let Some(vertex_elements) = payload.get("vertex") {
        mesh.vertices.reserve(vertex_elements.len());
        for element in vertex_elements {
            let x = float_property(element, "x").unwrap_or(0.0);
            let y = float_property(element, "y").unwrap_or(0.0);
            let z = float_property(element, "z").unwrap_or(0.0);
            let mut vertex = Vertex::from_coords(x, y, z);

            if let (Some(nx), Some(ny), Some(nz)) = (
                float_property(element, "nx"),
                float_property(element, "ny"),
                float_property(element, "nz"),
            ) {
                let n = Vector3::new(nx, ny, nz);
                if n.norm() > f64::EPSILON {
                    vertex = vertex.with_normal(n);
                }
            }
            mesh.vertices.push(vertex);
        }
    }

    let mut labels = Vec::new();
    let mut any_label = false;
    if let Some(face_elements) = payload.get("face") {
        mesh.faces.reserve(face_elements.len());
        for element in face_elements {
            let indices = index_list(element);
            if indices.len() < 3 {
                continue;
            }
            let label = int_property(element, "label");
            any_label |= label.is_some();
            // Fan triangulation for polygons beyond triangles
            for i in 1..indices.len() - 1 {
                mesh.faces
                    .push([indices[0] as u32, indices[i] as u32, indices[i + 1] as u32]);
                labels.push(label.unwrap_or(0));
            }
        }
    }

    if any_label {
        mesh.face_labels = labels;
    }

    Ok(mesh)
}

/// Extract a float-valued property from a PLY element.
fn float_property(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

/// Extract an int-valued property from a PLY element.
fn int_property(element: &DefaultElement, key: &str) -> Option<i32> {
    match element.get(key)? {
        Property::Int(v) => Some(*v),
        Property::Short(v) => Some(i32::from(*v)),
        Property::UChar(v) => Some(i32::from(*v)),
        Property::UShort(v) => Some(i32::from(*v)),
        _ => None,
    }
}

/// Extract the vertex index list from a face element.
#[allow(clippy::cast_sign_loss)]
fn index_list(element: &DefaultElement) -> Vec<usize> {
    for key in ["vertex_indices", "vertex_index"] {
        if let Some(prop) = element.get(key) {
            return match prop {
                Property::ListInt(v) => v.iter().map(|&i| i as usize).collect(),
                Property::ListUInt(v) => v.iter().map(|&i| i as usize).collect(),
                Property::ListUChar(v) => v.iter().map(|&i| usize::from(i)).collect(),
                Property::ListUShort(v) => v.iter().map(|&i| usize::from(i)).collect(),
                Property::ListShort(v) => v.iter().map(|&i| i as usize).collect(),
                Property::ListChar(v) => v.iter().map(|&i| i as usize).collect(),
                _ => continue,
            };
        }
    }
    Vec::new()
}
