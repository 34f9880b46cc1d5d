//! Parallel render sessions.
//!
//! A render pass partitions the image into horizontal bands and dispatches
//! one OS worker thread per band. Workers share the scene read-only and
//! write finished pixels into a mutex-guarded RGBA8 buffer that a display
//! layer can snapshot at any time; a shared atomic flag provides
//! cooperative cancellation at pixel granularity.

use crate::{color, integrator::ray_color, Camera, Color, World};
use rand::Rng;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Quality and scheduling knobs for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Independently jittered camera rays averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum path depth before a ray's contribution is truncated
    pub max_depth: u32,
    /// Worker thread count; None uses the available hardware parallelism
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            threads: None,
        }
    }
}

impl RenderSettings {
    fn resolve_threads(&self) -> usize {
        self.threads
            .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1)
    }
}

/// Errors from session control operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A render pass is already in flight.
    #[error("a render is already running")]
    AlreadyRendering,
}

/// Shared RGBA8 pixel storage.
///
/// Cloning the handle shares the same underlying buffer. Row 0 is the
/// bottom image row; presentation layers that want top-down rows flip on
/// read. The mutex is held for a single pixel write or a whole-buffer
/// operation, never across any sampling work.
#[derive(Clone)]
pub struct Framebuffer {
    inner: Arc<FramebufferInner>,
}

struct FramebufferInner {
    width: u32,
    height: u32,
    pixels: Mutex<Vec<u8>>,
}

impl Framebuffer {
    /// Allocate a zeroed buffer of `width * height` RGBA pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Arc::new(FramebufferInner {
                width,
                height,
                pixels: Mutex::new(vec![0; (width * height * 4) as usize]),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Store one finished pixel. (x, y) must be in bounds.
    ///
    /// All four bytes go in under one lock acquisition so concurrent
    /// writers can never interleave within a pixel.
    pub fn write_pixel(&self, x: u32, y: u32, rgba: [u8; 4]) {
        debug_assert!(x < self.inner.width && y < self.inner.height);
        let index = ((y * self.inner.width + x) * 4) as usize;

        let mut pixels = self.lock();
        pixels[index..index + 4].copy_from_slice(&rgba);
    }

    /// Copy of the whole buffer, for texture upload or file output.
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Zero every pixel.
    pub fn clear(&self) {
        self.lock().fill(0);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // A worker that panicked mid-write must not wedge the buffer for
        // the display layer; the pixel it was writing is garbage either way.
        self.inner
            .pixels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Joinable handle to an in-flight render pass.
pub struct RenderHandle {
    active: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl RenderHandle {
    /// True while any worker is still producing pixels.
    pub fn is_running(&self) -> bool {
        self.workers.iter().any(|worker| !worker.is_finished())
    }

    /// Ask all workers to stop after their current pixel.
    pub fn cancel(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Block until every worker has exited.
    pub fn join(self) {
        for worker in self.workers {
            // A panicked worker has already lost its band; the other
            // bands are unaffected.
            let _ = worker.join();
        }
    }

    /// Cancel, then block until all workers have exited.
    pub fn cancel_and_join(self) {
        self.cancel();
        self.join();
    }
}

/// Split `[0, height)` into `workers` contiguous bands.
///
/// Every row lands in exactly one band; the last band absorbs the
/// remainder when the height does not divide evenly.
fn partition_rows(height: u32, workers: usize) -> Vec<Range<u32>> {
    let workers = workers.max(1).min(height.max(1) as usize) as u32;
    let band = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * band;
            let end = if i == workers - 1 { height } else { start + band };
            start..end
        })
        .collect()
}

/// Dispatch one worker per band against the fixed scene and camera, and
/// return immediately.
///
/// The scene is shared read-only through the `Arc`; the camera is copied
/// into each worker, so neither needs a lock for the duration of the pass.
pub fn start_render(
    world: Arc<World>,
    camera: Camera,
    framebuffer: Framebuffer,
    settings: RenderSettings,
) -> RenderHandle {
    let active = Arc::new(AtomicBool::new(true));
    let bands = partition_rows(framebuffer.height(), settings.resolve_threads());

    log::info!(
        "render started: {}x{}, {} spp, depth {}, {} workers",
        framebuffer.width(),
        framebuffer.height(),
        settings.samples_per_pixel,
        settings.max_depth,
        bands.len()
    );

    let workers = bands
        .into_iter()
        .map(|rows| {
            let world = Arc::clone(&world);
            let framebuffer = framebuffer.clone();
            let active = Arc::clone(&active);
            thread::spawn(move || render_band(&world, camera, &framebuffer, settings, &active, rows))
        })
        .collect();

    RenderHandle { active, workers }
}

/// Render every pixel of the band, top row of the band first.
fn render_band(
    world: &World,
    camera: Camera,
    framebuffer: &Framebuffer,
    settings: RenderSettings,
    active: &AtomicBool,
    rows: Range<u32>,
) {
    let width = framebuffer.width();
    let height = framebuffer.height();
    let mut rng = rand::thread_rng();

    for y in rows.clone().rev() {
        for x in 0..width {
            // Cancellation is cooperative; pixels already written stay.
            if !active.load(Ordering::Relaxed) {
                log::debug!("band {}..{} cancelled", rows.start, rows.end);
                return;
            }

            let mut pixel_color = Color::ZERO;
            for _ in 0..settings.samples_per_pixel {
                let u = (x as f64 + rng.gen::<f64>()) / (width - 1) as f64;
                let v = (y as f64 + rng.gen::<f64>()) / (height - 1) as f64;
                let ray = camera.get_ray(u, v, &mut rng);
                pixel_color += ray_color(&ray, world, settings.max_depth, &mut rng);
            }

            framebuffer.write_pixel(x, y, color::to_rgba8(pixel_color, settings.samples_per_pixel));
        }
    }

    log::debug!("band {}..{} finished", rows.start, rows.end);
}

/// Owns the pixel buffer and at most one in-flight render pass.
///
/// Drives the Idle -> Rendering -> Idle lifecycle. The buffer persists
/// across passes, so a display layer can hold one [`Framebuffer`] handle
/// for the lifetime of the session.
pub struct RenderSession {
    world: Arc<World>,
    camera: Camera,
    settings: RenderSettings,
    framebuffer: Framebuffer,
    handle: Option<RenderHandle>,
}

impl RenderSession {
    pub fn new(
        world: World,
        camera: Camera,
        width: u32,
        height: u32,
        settings: RenderSettings,
    ) -> Self {
        Self {
            world: Arc::new(world),
            camera,
            settings,
            framebuffer: Framebuffer::new(width, height),
            handle: None,
        }
    }

    /// Handle to the shared pixel buffer.
    pub fn framebuffer(&self) -> Framebuffer {
        self.framebuffer.clone()
    }

    /// True while a pass is producing pixels.
    pub fn is_rendering(&self) -> bool {
        self.handle.as_ref().is_some_and(RenderHandle::is_running)
    }

    /// Start a new render pass over the current scene and camera.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_rendering() {
            return Err(SessionError::AlreadyRendering);
        }

        // Reap the previous pass's workers before dispatching new ones.
        if let Some(handle) = self.handle.take() {
            handle.join();
        }

        self.handle = Some(start_render(
            Arc::clone(&self.world),
            self.camera,
            self.framebuffer.clone(),
            self.settings,
        ));
        Ok(())
    }

    /// Block until the in-flight pass (if any) runs to completion.
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join();
        }
    }

    /// Stop the in-flight pass (if any) and block until workers exit.
    /// Pixels finished before the stop keep their contents.
    pub fn cancel_and_join(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel_and_join();
        }
    }

    /// Stop any in-flight pass, then zero the pixel buffer.
    pub fn clear(&mut self) {
        self.cancel_and_join();
        self.framebuffer.clear();
    }

    /// Replace the camera. An in-flight pass keeps the camera it was
    /// started with; the replacement applies from the next `start`.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Replace the scene. As with the camera, applies from the next pass.
    pub fn set_world(&mut self, world: World) {
        self.world = Arc::new(world);
    }

    /// Replace quality settings for subsequent passes.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, Hittable, Material, Sphere};
    use ember_math::Vec3;

    fn test_world() -> World {
        let mut world = World::new();
        world.add(Hittable::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::lambertian(Color::splat(0.5)),
        )));
        world
    }

    fn test_camera() -> Camera {
        Camera::new(&CameraConfig {
            vfov: 90.0,
            aspect_ratio: 1.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            aperture: 0.0,
            focus_dist: 1.0,
        })
    }

    #[test]
    fn test_partition_covers_all_rows_once() {
        for (height, workers) in [(100, 7), (64, 8), (1, 4), (33, 2), (9, 16)] {
            let bands = partition_rows(height, workers);

            let mut covered = vec![0u32; height as usize];
            for band in &bands {
                assert!(band.start < band.end, "empty band for {height}/{workers}");
                for row in band.clone() {
                    covered[row as usize] += 1;
                }
            }
            assert!(covered.iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn test_partition_last_band_absorbs_remainder() {
        let bands = partition_rows(100, 7);
        assert_eq!(bands.len(), 7);
        assert_eq!(bands[0], 0..14);
        assert_eq!(bands[6], 84..100);
    }

    #[test]
    fn test_framebuffer_pixel_write() {
        let framebuffer = Framebuffer::new(4, 4);
        framebuffer.write_pixel(1, 2, [10, 20, 30, 255]);

        let bytes = framebuffer.snapshot();
        let index = ((2 * 4 + 1) * 4) as usize;
        assert_eq!(&bytes[index..index + 4], &[10, 20, 30, 255]);

        framebuffer.clear();
        assert!(framebuffer.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_session_renders_to_completion() {
        let settings = RenderSettings {
            samples_per_pixel: 2,
            max_depth: 4,
            threads: Some(3),
        };
        let mut session = RenderSession::new(test_world(), test_camera(), 16, 9, settings);

        session.start().unwrap();
        session.wait();
        assert!(!session.is_rendering());

        let bytes = session.framebuffer().snapshot();
        assert_eq!(bytes.len(), 16 * 9 * 4);
        // Every pixel was produced: opaque alpha everywhere.
        for pixel in bytes.chunks(4) {
            assert_eq!(pixel[3], 255);
        }
        // The sky gradient guarantees colored pixels.
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_start_while_rendering_is_rejected() {
        let settings = RenderSettings {
            samples_per_pixel: 400,
            max_depth: 16,
            threads: Some(2),
        };
        let mut session = RenderSession::new(test_world(), test_camera(), 128, 128, settings);

        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::AlreadyRendering));
        session.cancel_and_join();
        assert!(!session.is_rendering());
    }

    #[test]
    fn test_clear_zeroes_buffer_after_cancel() {
        let settings = RenderSettings {
            samples_per_pixel: 400,
            max_depth: 16,
            threads: Some(2),
        };
        let mut session = RenderSession::new(test_world(), test_camera(), 128, 128, settings);

        session.start().unwrap();
        session.clear();
        assert!(!session.is_rendering());
        assert!(session.framebuffer().snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_restart_after_completion() {
        let settings = RenderSettings {
            samples_per_pixel: 1,
            max_depth: 2,
            threads: Some(1),
        };
        let mut session = RenderSession::new(test_world(), test_camera(), 8, 8, settings);

        session.start().unwrap();
        session.wait();
        // A finished pass no longer blocks a new one.
        session.start().unwrap();
        session.wait();
        assert!(!session.is_rendering());
    }
}
