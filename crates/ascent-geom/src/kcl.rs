// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! KCL collision container codec.
//!
//! Layout (little-endian unless noted):
//!
//! File header, `0x34` bytes:
//! - `0x00` magic `0x02020000` (big-endian)
//! - `0x04` octree offset, `0x08` model-offset table offset, `0x0C` model count
//! - `0x10` bounds min `3 × f32`, `0x1C` bounds max `3 × f32`
//! - `0x28` coordinate shift `3 × u32`
//!
//! The model-offset table holds `model count` absolute `u32` offsets. Each
//! model starts with a `0x3C`-byte header whose first four `i32` fields are
//! the offsets (relative to the model start) of the vertex, normal, triangle
//! and spatial-index sections. Section sizes follow from those offsets:
//! vertices and normals are 12-byte `f32` triples, triangles are `0x14`-byte
//! records:
//!
//! - `0x00` length `f32`
//! - `0x04` vertex index, `0x06` direction index `u16`
//! - `0x08`, `0x0A`, `0x0C` edge-normal indices A, B, C `u16`
//! - `0x0E` collision flags `u16`, `0x10` global triangle index `u32`
//!
//! Triangles are stored compactly as one vertex plus normals; see
//! [`RawModel::reconstruct`].

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::MeshError;
use crate::math::Vec3;
use crate::types::{Aabb, Triangle};

/// Magic number at the start of every collision container.
pub const KCL_MAGIC: u32 = 0x0202_0000;

const FILE_HEADER_SIZE: usize = 0x34;
const MODEL_HEADER_SIZE: usize = 0x3C;
const VEC3_SIZE: usize = 12;
const TRIANGLE_SIZE: usize = 0x14;
const MAX_TABLE_LEN: usize = u16::MAX as usize + 1;

/// One encoded triangle record.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RawTriangle {
    /// Distance scalar used by the reconstruction.
    pub length: f32,
    /// Index of the anchor vertex.
    pub vertex: u16,
    /// Index of the face normal.
    pub direction: u16,
    /// Index of edge normal A.
    pub normal_a: u16,
    /// Index of edge normal B.
    pub normal_b: u16,
    /// Index of edge normal C.
    pub normal_c: u16,
    /// Surface attribute flags (unused by the collision engine).
    pub flags: u16,
    /// Triangle index across the whole container.
    pub global_index: u32,
}

/// Undecoded model tables as stored in the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModel {
    /// Shared vertex table.
    pub vertices: Vec<Vec3>,
    /// Shared normal table (face and edge normals).
    pub normals: Vec<Vec3>,
    /// Triangle records.
    pub triangles: Vec<RawTriangle>,
}

/// A decoded collision container.
#[derive(Debug, Clone, PartialEq)]
pub struct KclFile {
    /// Bounds declared in the file header, if they are well formed.
    pub bounds: Option<Aabb>,
    /// Models in table order.
    pub models: Vec<RawModel>,
}

impl RawModel {
    /// Rebuilds explicit triangles and their face normals.
    ///
    /// For each record, with `p` the anchor vertex, `d` the face normal and
    /// `a`, `b`, `c` the edge normals:
    ///
    /// ```text
    /// cross_a = a × d
    /// cross_b = b × d
    /// v1 = p
    /// v2 = p + cross_b · (length / (cross_b · c))
    /// v3 = p + cross_a · (length / (cross_a · c))
    /// ```
    ///
    /// `model` is only used to label errors.
    pub fn reconstruct(&self, model: usize) -> Result<(Vec<Triangle>, Vec<Vec3>), MeshError> {
        let mut triangles = Vec::with_capacity(self.triangles.len());
        let mut face_normals = Vec::with_capacity(self.triangles.len());
        for (triangle, raw) in self.triangles.iter().enumerate() {
            let vertex = |index: u16| {
                let index = usize::from(index);
                self.vertices.get(index).copied().ok_or(MeshError::IndexOutOfRange {
                    model,
                    triangle,
                    table: "vertex",
                    index,
                    len: self.vertices.len(),
                })
            };
            let normal = |index: u16| {
                let index = usize::from(index);
                self.normals.get(index).copied().ok_or(MeshError::IndexOutOfRange {
                    model,
                    triangle,
                    table: "normal",
                    index,
                    len: self.normals.len(),
                })
            };

            let position = vertex(raw.vertex)?;
            let direction = normal(raw.direction)?;
            let normal_a = normal(raw.normal_a)?;
            let normal_b = normal(raw.normal_b)?;
            let normal_c = normal(raw.normal_c)?;

            let cross_a = normal_a.cross(direction);
            let cross_b = normal_b.cross(direction);
            let v1 = position;
            let v2 = position + cross_b * (raw.length / cross_b.dot(normal_c));
            let v3 = position + cross_a * (raw.length / cross_a.dot(normal_c));

            if !(v1.is_finite() && v2.is_finite() && v3.is_finite() && direction.is_finite()) {
                return Err(MeshError::NonFinite { model, triangle });
            }
            triangles.push(Triangle::new(v1, v2, v3));
            face_normals.push(direction);
        }
        Ok((triangles, face_normals))
    }

    /// Encodes explicit triangles into compact records.
    ///
    /// The face normal is taken from the winding order. Each triangle gets its
    /// own vertex and four normal entries; no deduplication is attempted.
    pub fn from_triangles(model: usize, triangles: &[Triangle]) -> Result<Self, MeshError> {
        if triangles.len() * 4 > MAX_TABLE_LEN {
            return Err(MeshError::TooLarge { model, count: triangles.len() * 4 });
        }
        let mut raw = Self::default();
        for (i, tri) in triangles.iter().enumerate() {
            let [a, b, c] = tri.vertices;
            let direction = tri.geometric_normal();
            if direction == Vec3::ZERO {
                return Err(MeshError::Degenerate(i));
            }
            let normal_a = direction.cross(c - a).normalize();
            let normal_b = direction.cross(b - a).normalize();
            let normal_c = direction.cross(c - b).normalize();
            let length = (c - a).dot(normal_c);

            #[allow(clippy::cast_possible_truncation)]
            let base = raw.normals.len() as u16;
            #[allow(clippy::cast_possible_truncation)]
            let vertex = raw.vertices.len() as u16;
            raw.vertices.push(a);
            raw.normals.extend([direction, normal_a, normal_b, normal_c]);
            #[allow(clippy::cast_possible_truncation)]
            raw.triangles.push(RawTriangle {
                length,
                vertex,
                direction: base,
                normal_a: base + 1,
                normal_b: base + 2,
                normal_c: base + 3,
                flags: 0,
                global_index: i as u32,
            });
        }
        Ok(raw)
    }
}

fn read<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], MeshError> {
    let truncated = || MeshError::Truncated { offset, needed: N, len: bytes.len() };
    let end = offset.checked_add(N).ok_or_else(truncated)?;
    let slice = bytes.get(offset..end).ok_or_else(truncated)?;
    slice.try_into().map_err(|_| truncated())
}

fn u16_le(bytes: &[u8], offset: usize) -> Result<u16, MeshError> {
    read::<2>(bytes, offset).map(u16::from_le_bytes)
}

fn u32_le(bytes: &[u8], offset: usize) -> Result<u32, MeshError> {
    read::<4>(bytes, offset).map(u32::from_le_bytes)
}

fn i32_le(bytes: &[u8], offset: usize) -> Result<i32, MeshError> {
    read::<4>(bytes, offset).map(i32::from_le_bytes)
}

fn f32_le(bytes: &[u8], offset: usize) -> Result<f32, MeshError> {
    read::<4>(bytes, offset).map(f32::from_le_bytes)
}

fn vec3_le(bytes: &[u8], offset: usize) -> Result<Vec3, MeshError> {
    Ok(Vec3::new(f32_le(bytes, offset)?, f32_le(bytes, offset + 4)?, f32_le(bytes, offset + 8)?))
}

fn section_offset(bytes: &[u8], at: usize, model: usize) -> Result<usize, MeshError> {
    usize::try_from(i32_le(bytes, at)?)
        .map_err(|_| MeshError::BadLayout { model, detail: "negative section offset" })
}

/// Decodes a complete collision container.
pub fn decode_kcl(bytes: &[u8]) -> Result<KclFile, MeshError> {
    let magic = read::<4>(bytes, 0).map(u32::from_be_bytes)?;
    if magic != KCL_MAGIC {
        return Err(MeshError::BadMagic(magic));
    }
    let table_offset = u32_le(bytes, 0x08)? as usize;
    let model_count = u32_le(bytes, 0x0C)? as usize;
    let bounds = Aabb::try_new(vec3_le(bytes, 0x10)?, vec3_le(bytes, 0x1C)?);

    // Reject counts the buffer cannot possibly hold before allocating.
    let table_len = model_count.saturating_mul(4);
    if table_len > bytes.len() {
        return Err(MeshError::Truncated { offset: table_offset, needed: table_len, len: bytes.len() });
    }

    let mut models = Vec::with_capacity(model_count);
    for model in 0..model_count {
        let base = u32_le(bytes, table_offset + model * 4)? as usize;
        models.push(decode_model(bytes, base, model)?);
    }
    Ok(KclFile { bounds, models })
}

fn decode_model(bytes: &[u8], base: usize, model: usize) -> Result<RawModel, MeshError> {
    // Touch the full header so truncation is reported at the header.
    read::<MODEL_HEADER_SIZE>(bytes, base)?;
    let verts = section_offset(bytes, base, model)?;
    let normals = section_offset(bytes, base + 4, model)?;
    let tris = section_offset(bytes, base + 8, model)?;
    let spatial = section_offset(bytes, base + 12, model)?;
    if !(verts <= normals && normals <= tris && tris <= spatial) {
        return Err(MeshError::BadLayout { model, detail: "sections out of order" });
    }
    if base + spatial > bytes.len() {
        return Err(MeshError::Truncated { offset: base + tris, needed: spatial - tris, len: bytes.len() });
    }

    let vertex_count = (normals - verts) / VEC3_SIZE;
    let normal_count = (tris - normals) / VEC3_SIZE;
    let triangle_count = (spatial - tris) / TRIANGLE_SIZE;

    let vertices = (0..vertex_count)
        .map(|i| vec3_le(bytes, base + verts + i * VEC3_SIZE))
        .collect::<Result<Vec<_>, _>>()?;
    let normals_table = (0..normal_count)
        .map(|i| vec3_le(bytes, base + normals + i * VEC3_SIZE))
        .collect::<Result<Vec<_>, _>>()?;
    let triangles = (0..triangle_count)
        .map(|i| {
            let at = base + tris + i * TRIANGLE_SIZE;
            Ok(RawTriangle {
                length: f32_le(bytes, at)?,
                vertex: u16_le(bytes, at + 0x04)?,
                direction: u16_le(bytes, at + 0x06)?,
                normal_a: u16_le(bytes, at + 0x08)?,
                normal_b: u16_le(bytes, at + 0x0A)?,
                normal_c: u16_le(bytes, at + 0x0C)?,
                flags: u16_le(bytes, at + 0x0E)?,
                global_index: u32_le(bytes, at + 0x10)?,
            })
        })
        .collect::<Result<Vec<_>, MeshError>>()?;

    Ok(RawModel { vertices, normals: normals_table, triangles })
}

/// Encodes one or more triangle sets as a collision container.
///
/// The output has no octree (the octree offset points at the model table)
/// and empty spatial-index sections; [`decode_kcl`] reads it back exactly.
pub fn encode_kcl(models: &[Vec<Triangle>]) -> Result<Bytes, MeshError> {
    let raws = models
        .iter()
        .enumerate()
        .map(|(i, tris)| RawModel::from_triangles(i, tris))
        .collect::<Result<Vec<_>, _>>()?;

    let all: Vec<Vec3> = models.iter().flatten().flat_map(|t| t.vertices).collect();
    let bounds = Aabb::from_points(&all).unwrap_or_else(|| Aabb::new(Vec3::ZERO, Vec3::ZERO));

    let table_offset = FILE_HEADER_SIZE;
    let mut model_offsets = Vec::with_capacity(raws.len());
    let mut cursor = table_offset + raws.len() * 4;
    for raw in &raws {
        model_offsets.push(cursor);
        cursor += model_size(raw);
    }

    let mut out = BytesMut::with_capacity(cursor);
    out.put_u32(KCL_MAGIC);
    put_usize(&mut out, table_offset); // no octree
    put_usize(&mut out, table_offset);
    put_usize(&mut out, raws.len());
    put_vec3(&mut out, bounds.min());
    put_vec3(&mut out, bounds.max());
    for _ in 0..3 {
        out.put_u32_le(0);
    }
    for offset in &model_offsets {
        put_usize(&mut out, *offset);
    }
    for raw in &raws {
        put_model(&mut out, raw);
    }
    Ok(out.freeze())
}

fn model_size(raw: &RawModel) -> usize {
    MODEL_HEADER_SIZE
        + (raw.vertices.len() + raw.normals.len()) * VEC3_SIZE
        + raw.triangles.len() * TRIANGLE_SIZE
}

#[allow(clippy::cast_possible_truncation)]
fn put_usize(out: &mut BytesMut, value: usize) {
    out.put_u32_le(value as u32);
}

fn put_vec3(out: &mut BytesMut, v: Vec3) {
    for c in v.to_array() {
        out.put_f32_le(c);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn put_model(out: &mut BytesMut, raw: &RawModel) {
    let verts = MODEL_HEADER_SIZE;
    let normals = verts + raw.vertices.len() * VEC3_SIZE;
    let tris = normals + raw.normals.len() * VEC3_SIZE;
    let spatial = tris + raw.triangles.len() * TRIANGLE_SIZE;
    for offset in [verts, normals, tris, spatial] {
        out.put_i32_le(offset as i32);
    }
    out.put_f32_le(0.0); // prism thickness
    put_vec3(out, Vec3::ZERO); // spatial grid origin
    for _ in 0..3 {
        out.put_u32_le(0); // coordinate mask
    }
    for _ in 0..3 {
        out.put_u32_le(0); // coordinate shift
    }
    out.put_f32_le(0.0); // sphere search width

    for v in &raw.vertices {
        put_vec3(out, *v);
    }
    for n in &raw.normals {
        put_vec3(out, *n);
    }
    for t in &raw.triangles {
        out.put_f32_le(t.length);
        out.put_u16_le(t.vertex);
        out.put_u16_le(t.direction);
        out.put_u16_le(t.normal_a);
        out.put_u16_le(t.normal_b);
        out.put_u16_le(t.normal_c);
        out.put_u16_le(t.flags);
        out.put_u32_le(t.global_index);
    }
}
