use bsp_csg::Operation;
use csg_viz::{OrbitCamera, Scene, View};
use macroquad::prelude::*;

#[macroquad::main("CSG Viewer")]
async fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let mut camera = OrbitCamera::new(4.0, 0.6, 0.5).with_target(vec3(0.4, 0.3, 0.4));
    let mut wireframe = true;

    loop {
        camera.update();

        let view = if is_key_pressed(KeyCode::Key1) {
            Some(View::Result(Operation::Union))
        } else if is_key_pressed(KeyCode::Key2) {
            Some(View::Result(Operation::Intersect))
        } else if is_key_pressed(KeyCode::Key3) {
            Some(View::Result(Operation::Difference))
        } else if is_key_pressed(KeyCode::Key4) {
            Some(View::Inputs)
        } else {
            None
        };
        if let Some(view) = view {
            scene.view = view;
            scene.recompute();
        }
        if is_key_pressed(KeyCode::F) {
            scene.options.bounding_box_filter = !scene.options.bounding_box_filter;
            scene.recompute();
        }
        if is_key_pressed(KeyCode::R) {
            scene.options.recombine = !scene.options.recombine;
            scene.recompute();
        }
        if is_key_pressed(KeyCode::W) {
            wireframe = !wireframe;
        }
        if is_key_down(KeyCode::Space) {
            scene.spin += 0.01;
            scene.rebuild();
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        scene.draw(wireframe);

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        let (polygons, volume, area) = scene.stats();
        draw_text(&format!("CSG: {}", scene.view.label()), 10.0, 25.0, 22.0, WHITE);
        draw_text(
            &format!("{polygons} polygons | volume {volume:.4} | area {area:.4}"),
            10.0,
            48.0,
            18.0,
            GRAY,
        );
        draw_text(
            &format!(
                "bbox filter [F]: {} | recombine [R]: {} | wireframe [W]",
                scene.options.bounding_box_filter, scene.options.recombine
            ),
            10.0,
            68.0,
            16.0,
            YELLOW,
        );
        draw_text(
            "[1] union  [2] intersect  [3] difference  [4] inputs  [Space] spin B",
            10.0,
            88.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 108.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
