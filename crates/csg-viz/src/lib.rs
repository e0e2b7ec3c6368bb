//! Rendering helpers and scene state for the CSG viewer.

use bsp_csg::{
    shapes, signed_volume, surface_area, CsgOptions, MeshPolygon, Operation, Plane3D, Polygon,
};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Vector3};

/// Direction of the light used for flat shading.
const LIGHT: Vec3 = Vec3::new(0.4, 0.8, 0.45);

/// Shades `base` by how much the face turns towards the light, so every
/// fragment of one face gets the same colour.
pub fn shade(polygon: &Polygon, base: Color) -> Color {
    let n = polygon.normal();
    let lambert = vec3(n.x, n.y, n.z).dot(LIGHT.normalize()).max(0.0);
    let k = 0.35 + 0.65 * lambert;
    Color::new(base.r * k, base.g * k, base.b * k, base.a)
}

/// Draws a single polygon as a triangle fan.
pub fn draw_polygon(polygon: &Polygon, color: Color) {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return;
    }

    let mesh_vertices: Vec<Vertex> = vertices
        .iter()
        .map(|v| {
            let p = v.position;
            Vertex::new2(vec3(p.x, p.y, p.z), vec2(v.uv.x, v.uv.y), color)
        })
        .collect();

    let mut indices: Vec<u16> = Vec::with_capacity((vertices.len() - 2) * 3);
    for i in 1..vertices.len() - 1 {
        indices.extend([0, i as u16, (i + 1) as u16]);
    }

    draw_mesh(&Mesh {
        vertices: mesh_vertices,
        indices,
        texture: None,
    });
}

/// Draws the edges of a polygon, which makes fragmentation visible.
pub fn draw_outline(polygon: &Polygon, color: Color) {
    let vertices = polygon.vertices();
    for (i, v) in vertices.iter().enumerate() {
        let a = v.position;
        let b = vertices[(i + 1) % vertices.len()].position;
        draw_line_3d(vec3(a.x, a.y, a.z), vec3(b.x, b.y, b.z), color);
    }
}

/// Generates a cube of edge length `size` around `center`, rotated by
/// `rotation`.
///
/// The fourth corner of every face is projected onto the plane of the other
/// three so rounding after the rotation cannot leave a face non-planar.
pub fn rotated_cube(center: Point3<f32>, size: f32, rotation: &Rotation3<f32>) -> Vec<Polygon> {
    shapes::cube(Point3::origin(), size)
        .iter()
        .map(|face| {
            let corners: Vec<Point3<f32>> = (0..face.vertex_count())
                .map(|i| center + rotation * face.vertex_position(i).coords)
                .collect();
            let plane = Plane3D::from_three_points(corners[0], corners[1], corners[2]);
            Polygon::new(vec![
                corners[0],
                corners[1],
                corners[2],
                plane.project_point(corners[3]),
            ])
        })
        .collect()
}

/// What the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Inputs,
    Result(Operation),
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Inputs => "inputs",
            View::Result(Operation::Union) => "A union B",
            View::Result(Operation::Intersect) => "A intersect B",
            View::Result(Operation::Difference) => "A minus B",
        }
    }
}

/// Two operand solids and the result of combining them.
pub struct Scene {
    pub a: Vec<Polygon>,
    pub b: Vec<Polygon>,
    pub view: View,
    pub options: CsgOptions,
    /// Rotation of B around the vertical axis, in radians.
    pub spin: f32,
    result: Vec<Polygon>,
}

impl Scene {
    pub fn new() -> Self {
        let mut scene = Self {
            a: shapes::cube(Point3::new(0.0, 0.0, 0.0), 1.0),
            b: Vec::new(),
            view: View::Result(Operation::Difference),
            options: CsgOptions::default(),
            spin: 0.3,
            result: Vec::new(),
        };
        scene.rebuild();
        scene
    }

    /// Regenerates B from `spin` and recomputes the result.
    pub fn rebuild(&mut self) {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), self.spin);
        self.b = rotated_cube(Point3::new(0.45, 0.35, 0.4), 0.9, &rotation);
        self.recompute();
    }

    pub fn recompute(&mut self) {
        let View::Result(op) = self.view else {
            self.result.clear();
            return;
        };
        self.result = op.apply(self.a.clone(), self.b.clone(), &self.options);
        log::info!(
            "{}: {} polygons, volume {:.4}",
            self.view.label(),
            self.result.len(),
            signed_volume(&self.result)
        );
    }

    pub fn result(&self) -> &[Polygon] {
        &self.result
    }

    /// `(polygons, volume, area)` of what is currently shown.
    pub fn stats(&self) -> (usize, f32, f32) {
        match self.view {
            View::Inputs => (
                self.a.len() + self.b.len(),
                signed_volume(&self.a) + signed_volume(&self.b),
                surface_area(&self.a) + surface_area(&self.b),
            ),
            View::Result(_) => (
                self.result.len(),
                signed_volume(&self.result),
                surface_area(&self.result),
            ),
        }
    }

    pub fn draw(&self, wireframe: bool) {
        match self.view {
            View::Inputs => {
                self.draw_solid(&self.a, Color::from_rgba(90, 160, 230, 255), wireframe);
                self.draw_solid(&self.b, Color::from_rgba(230, 140, 80, 255), wireframe);
            }
            View::Result(_) => {
                self.draw_solid(&self.result, Color::from_rgba(120, 200, 140, 255), wireframe);
            }
        }
    }

    fn draw_solid(&self, polygons: &[Polygon], base: Color, wireframe: bool) {
        for polygon in polygons {
            draw_polygon(polygon, shade(polygon, base));
            if wireframe {
                draw_outline(polygon, BLACK);
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbit camera around a target point, driven by mouse drag, scroll and
/// arrow keys.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
}

impl OrbitCamera {
    const MIN_DISTANCE: f32 = 1.5;
    const MAX_DISTANCE: f32 = 20.0;
    const KEY_STEP: f32 = 0.02;

    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: Vec3::ZERO,
        }
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }
        if is_key_down(KeyCode::Left) {
            self.yaw += Self::KEY_STEP;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= Self::KEY_STEP;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += Self::KEY_STEP;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= Self::KEY_STEP;
        }
        // Stay clear of the poles
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        self.distance = (self.distance - mouse_wheel().1 * 0.5)
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: Vec3::Y,
            target: self.target,
            ..Default::default()
        }
    }
}
