use crate::mesh::Mesh;
use crate::triangulated::Triangulated3D;
use dxf::entities::{Entity, EntityType, Face3D};
use dxf::{Drawing, DxfError, Point};
use std::fmt::Debug;

#[allow(clippy::unnecessary_cast)]
fn dxf_point(v: &crate::mesh::vertex::Vertex) -> Point {
    Point::new(v.pos.x as f64, v.pos.y as f64, v.pos.z as f64)
}

/// Export any `Triangulated3D` shape as a DXF drawing of `3DFACE` entities.
pub fn to_dxf<T: Triangulated3D>(shape: &T) -> Result<Vec<u8>, DxfError> {
    let mut drawing = Drawing::new();

    shape.visit_triangles(|tri| {
        // Face3D has four corners; a triangle repeats its last one.
        let face = Face3D::new(
            dxf_point(&tri[0]),
            dxf_point(&tri[1]),
            dxf_point(&tri[2]),
            dxf_point(&tri[2]),
        );
        drawing.add_entity(Entity::new(EntityType::Face3D(face)));
    });

    let mut buffer = Vec::new();
    drawing.save(&mut buffer)?;
    Ok(buffer)
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    pub fn to_dxf(&self) -> Result<Vec<u8>, DxfError> {
        self::to_dxf(self)
    }
}
