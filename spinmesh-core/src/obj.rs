/// Loader for the vertex/face subset of the Wavefront OBJ format
///
/// Only two record kinds are understood:
///
/// ```text
/// v <x> <y> <z>     vertex, numbered from 1 in declaration order
/// f <i> <j> <k>     triangle referencing vertices declared above it
/// ```
///
/// Every other line is skipped.
use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, one_of, space1},
    combinator::{eof, map, opt, recognize, verify},
    multi::count,
    number::complete::float,
    sequence::{pair, preceded, terminated},
    IResult,
};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::mesh::{Mesh, Triangle};
use crate::vector::Vec3;

/// Result of parsing an object file: the vertex pool and the triangles built from it
#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    pub vertices: Vec<Vec3>,
    pub mesh: Mesh,
}

impl ObjModel {
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

/// Read and parse an object file
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let model = parse_obj(&content)?;
    info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path,
        model.vertices.len(),
        model.mesh.len()
    );
    Ok(model.into_mesh())
}

/// Parse object file text
pub fn parse_obj(input: &str) -> Result<ObjModel, LoadError> {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_start();
        let malformed = || LoadError::Malformed {
            line: line_no,
            content: raw.to_string(),
        };

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, v) = vertex_record(line).map_err(|_| malformed())?;
                vertices.push(v);
            }
            Some("f") => {
                let (_, indices) = face_record(line).map_err(|_| malformed())?;
                let [a, b, c] = resolve_face(&indices, &vertices, line_no)?;
                triangles.push(Triangle::new(a, b, c));
            }
            _ => {}
        }
    }

    debug!(
        "Parsed {} vertices and {} faces",
        vertices.len(),
        triangles.len()
    );

    Ok(ObjModel {
        vertices,
        mesh: triangles.into_iter().collect(),
    })
}

/// Copy the referenced vertices out of the pool declared so far
fn resolve_face(indices: &[i64], vertices: &[Vec3], line: usize) -> Result<[Vec3; 3], LoadError> {
    let lookup = |index: i64| {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| vertices.get(i))
            .copied()
            .ok_or_else(|| LoadError::IndexOutOfRange {
                line,
                index,
                vertex_count: vertices.len(),
            })
    };

    Ok([lookup(indices[0])?, lookup(indices[1])?, lookup(indices[2])?])
}

/// Anything after the three numbers must be separated by whitespace
fn record_end(input: &str) -> IResult<&str, &str> {
    alt((space1, eof))(input)
}

fn vertex_record(input: &str) -> IResult<&str, Vec3> {
    map(
        preceded(
            tag("v"),
            terminated(count(preceded(space1, coordinate), 3), record_end),
        ),
        |c: Vec<f32>| Vec3::new(c[0], c[1], c[2]),
    )(input)
}

/// A coordinate; `nan`, `inf` and values overflowing f32 are rejected
fn coordinate(input: &str) -> IResult<&str, f32> {
    verify(float, |v: &f32| v.is_finite())(input)
}

/// A signed face index. Values beyond i64 saturate so they still fail the range check.
fn index(input: &str) -> IResult<&str, i64> {
    map(recognize(pair(opt(one_of("+-")), digit1)), |digits: &str| {
        digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        })
    })(input)
}

fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    preceded(
        tag("f"),
        terminated(count(preceded(space1, index), 3), record_end),
    )(input)
}
