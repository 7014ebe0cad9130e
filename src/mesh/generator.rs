// src/mesh/generator.rs

use crate::config::MeshSettings;
use crate::error::MorphResult;
use crate::field::ScalarField;
use crate::mesh::extract::IsosurfaceExtractor;
use crate::mesh::mesh::Mesh;
use crate::mesh::voxel::VoxelGrid;
use crate::types::{Point3D, Vec3};
use crate::utils::constants;
use bevy::log::info;

/// Erzeugt das Oberflächennetz eines Skalarfeldes.
///
/// Ein leeres Feld ist kein Fehler: die Bounds kollabieren auf einen
/// Punkt und das Ergebnis ist ein leeres Mesh. Die Windung der
/// Extraktor-Ausgabe wird invertiert (deren Konvention läuft andersherum
/// als unsere Konsumenten erwarten).
pub fn generate_mesh(
    field: &ScalarField,
    settings: &MeshSettings,
    extractor: &dyn IsosurfaceExtractor,
) -> MorphResult<Mesh> {
    settings.validate()?;

    let Some(grid) = VoxelGrid::sample(field, settings.resolution) else {
        return Ok(Mesh::default());
    };

    let (positions, mut indices) = extractor.extract(&grid, constants::SURFACE_THRESHOLD);
    indices.reverse();

    let mut mesh = Mesh::new(positions, indices);
    if settings.smooth_normals {
        let h = grid.cell.min_element() * 0.5;
        mesh.normals = Some(
            mesh.positions
                .iter()
                .map(|&p| field_normal(field, p, h))
                .collect(),
        );
    }

    info!(
        "generated mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Nach außen zeigende Normale aus dem Feldgradienten
/// (zentrale Differenzen; das Feld wächst nach innen).
fn field_normal(field: &ScalarField, p: Point3D, h: f32) -> Vec3 {
    let gradient = Vec3::new(
        field.value(p + Vec3::X * h) - field.value(p - Vec3::X * h),
        field.value(p + Vec3::Y * h) - field.value(p - Vec3::Y * h),
        field.value(p + Vec3::Z * h) - field.value(p - Vec3::Z * h),
    );
    (-gradient).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Falloff;
    use crate::mesh::extract::MarchingTetrahedra;

    #[test]
    fn test_empty_field_produces_empty_mesh() {
        let field = ScalarField::new();
        let mesh = generate_mesh(&field, &MeshSettings::default(), &MarchingTetrahedra).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_ball_mesh_has_outward_smooth_normals() {
        let mut field = ScalarField::new();
        field.add_ball(1.0, Vec3::ZERO, Falloff::POLYNOMIAL2);
        let settings = MeshSettings {
            resolution: 16,
            smooth_normals: true,
        };
        let mesh = generate_mesh(&field, &settings, &MarchingTetrahedra).unwrap();

        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), mesh.vertex_count());
        // auf einer Kugel zeigt die Normale vom Zentrum weg
        for (p, n) in mesh.positions.iter().zip(normals) {
            assert!(p.normalize().dot(*n) > 0.5, "normal {:?} at {:?}", n, p);
        }
    }

    #[test]
    fn test_invalid_resolution_is_rejected() {
        let field = ScalarField::new();
        let settings = MeshSettings {
            resolution: 1,
            smooth_normals: false,
        };
        assert!(generate_mesh(&field, &settings, &MarchingTetrahedra).is_err());
    }
}
