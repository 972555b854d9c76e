// Host-side lifecycle tests for the scene session.
// The web crate is wasm-only, so the session is driven here with a counting
// backend in place of wgpu.

use embrace_core::constants::{
    CAMERA_FOCAL_POINT, PARTICLE_BOUND_XY, PARTICLE_BOUND_Z, PARTICLE_COUNT,
};
use embrace_core::mesh::MeshData;
use embrace_core::*;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default, Debug)]
struct Counters {
    created: usize,
    released: usize,
    double_frees: usize,
    live: BTreeSet<u32>,
    resizes: Vec<Viewport>,
    renders: usize,
    draw_counts: BTreeSet<usize>,
    detached: usize,
}

struct MockBackend {
    counters: Rc<RefCell<Counters>>,
    next_id: u32,
    fail_on_create: Option<usize>,
}

impl MockBackend {
    fn new(counters: Rc<RefCell<Counters>>) -> Self {
        Self {
            counters,
            next_id: 1,
            fail_on_create: None,
        }
    }

    fn failing_on(counters: Rc<RefCell<Counters>>, nth: usize) -> Self {
        Self {
            fail_on_create: Some(nth),
            ..Self::new(counters)
        }
    }

    fn create(&mut self, label: &str) -> Result<ResourceId, SceneError> {
        let mut c = self.counters.borrow_mut();
        c.created += 1;
        if self.fail_on_create == Some(c.created) {
            return Err(SceneError::Backend(format!("{label}: out of memory")));
        }
        let id = self.next_id;
        self.next_id += 1;
        c.live.insert(id);
        Ok(ResourceId(id))
    }
}

impl RenderBackend for MockBackend {
    fn create_geometry(&mut self, label: &str, mesh: &MeshData) -> Result<ResourceId, SceneError> {
        assert!(!mesh.indices.is_empty(), "{label} has no triangles");
        self.create(label)
    }

    fn create_material(&mut self, label: &str, _material: &Material) -> Result<ResourceId, SceneError> {
        self.create(label)
    }

    fn create_particle_buffer(
        &mut self,
        label: &str,
        capacity: usize,
    ) -> Result<ResourceId, SceneError> {
        assert_eq!(capacity, PARTICLE_COUNT);
        self.create(label)
    }

    fn release(&mut self, id: ResourceId) {
        let mut c = self.counters.borrow_mut();
        if c.live.remove(&id.0) {
            c.released += 1;
        } else {
            c.double_frees += 1;
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.counters.borrow_mut().resizes.push(viewport);
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SceneError> {
        let mut c = self.counters.borrow_mut();
        c.renders += 1;
        c.draw_counts.insert(frame.draws.len());
        assert_eq!(frame.particles.positions.len(), PARTICLE_COUNT * 3);
        Ok(())
    }

    fn detach(&mut self) {
        self.counters.borrow_mut().detached += 1;
    }
}

struct DetachedContainer;

impl HostContainer for DetachedContainer {
    fn pixel_size(&self) -> Option<(u32, u32)> {
        None
    }
}

fn mounted_session(size: (u32, u32)) -> (SceneSession<MockBackend>, Rc<RefCell<Counters>>) {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut session = SceneSession::new();
    let backend_counters = counters.clone();
    session
        .mount(Some(&size), move |_| Ok(MockBackend::new(backend_counters)))
        .expect("mount");
    (session, counters)
}

fn run_for(session: &mut SceneSession<MockBackend>, total: Duration, step: Duration) {
    let steps = total.as_millis() / step.as_millis();
    for _ in 0..steps {
        session.tick(step);
    }
}

#[test]
fn twelve_seconds_returns_to_mount_phase_and_cleans_up() {
    let (mut session, counters) = mounted_session((800, 600));
    let start_phase = session.phase().expect("mounted");
    assert_eq!(session.viewport(), Some(Viewport { width: 800, height: 600 }));

    run_for(&mut session, Duration::from_secs(12), Duration::from_millis(20));

    assert_eq!(session.phase(), Some(start_phase));
    assert_eq!(session.elapsed(), Some(Duration::from_secs(12)));
    let particles = session.particles().expect("mounted");
    assert_eq!(particles.len(), PARTICLE_COUNT);
    for i in 0..particles.len() {
        let p = particles.position(i);
        assert!(p.x.abs() <= PARTICLE_BOUND_XY && p.y.abs() <= PARTICLE_BOUND_XY);
        assert!(p.z.abs() <= PARTICLE_BOUND_Z);
    }
    assert_eq!(counters.borrow().renders, 600);

    let created = counters.borrow().live.len();
    assert_eq!(session.live_resources(), created);
    assert_eq!(session.unmount(), created);
    let c = counters.borrow();
    assert!(c.live.is_empty());
    assert_eq!(c.double_frees, 0);
    assert_eq!(c.detached, 1);
    assert_eq!(session.live_resources(), 0);
}

#[test]
fn heart_is_drawn_only_during_heart_gesture() {
    let (mut session, counters) = mounted_session((800, 600));
    run_for(&mut session, Duration::from_secs(12), Duration::from_millis(50));
    let c = counters.borrow();
    let body_draws = FigureId::ALL.len() * FigurePart::ALL.len();
    assert_eq!(
        c.draw_counts,
        BTreeSet::from([body_draws, body_draws + 1]),
        "heart should come and go"
    );
}

#[test]
fn destroy_twice_is_a_no_op() {
    let (mut session, counters) = mounted_session((640, 480));
    session.tick(Duration::from_millis(16));
    assert!(session.unmount() > 0);
    assert_eq!(session.unmount(), 0);
    assert!(!session.is_mounted());
    let c = counters.borrow();
    assert_eq!(c.double_frees, 0);
    assert_eq!(c.detached, 1);
}

#[test]
fn unmount_without_mount_is_a_no_op() {
    let mut session: SceneSession<MockBackend> = SceneSession::new();
    assert_eq!(session.unmount(), 0);
    session.tick(Duration::from_millis(16));
    assert_eq!(session.phase(), None);
    assert_eq!(session.resize(&(100u32, 100u32)), ResizeOutcome::Ignored);
}

#[test]
fn dropping_a_session_releases_its_resources() {
    let (session, counters) = mounted_session((320, 240));
    assert!(!counters.borrow().live.is_empty());
    drop(session);
    let c = counters.borrow();
    assert!(c.live.is_empty());
    assert_eq!(c.detached, 1);
}

#[test]
fn missing_container_leaves_session_unmounted() {
    let mut session: SceneSession<MockBackend> = SceneSession::new();
    let mut called = false;
    let err = session
        .mount(None, |_| {
            called = true;
            Err(SceneError::Backend("unreachable".into()))
        })
        .unwrap_err();
    assert_eq!(err, SceneError::MissingContainer);
    assert!(err.is_expected());
    assert!(!called);
    assert!(!session.is_mounted());
}

#[test]
fn zero_sized_or_detached_container_is_rejected() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut session = SceneSession::new();
    let c1 = counters.clone();
    let err = session
        .mount(Some(&(0u32, 600u32)), move |_| Ok(MockBackend::new(c1)))
        .unwrap_err();
    assert_eq!(err, SceneError::EmptyViewport { width: 0, height: 600 });

    let c2 = counters.clone();
    let err = session
        .mount(Some(&DetachedContainer), move |_| Ok(MockBackend::new(c2)))
        .unwrap_err();
    assert_eq!(err, SceneError::EmptyViewport { width: 0, height: 0 });
    assert!(!session.is_mounted());
    assert_eq!(counters.borrow().created, 0);
}

#[test]
fn backend_creation_failure_allows_a_later_retry() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut session: SceneSession<MockBackend> = SceneSession::new();
    let err = session
        .mount(Some(&(800u32, 600u32)), |_| {
            Err(SceneError::Backend("no GPU surface".into()))
        })
        .unwrap_err();
    assert!(!err.is_expected());
    assert!(!session.is_mounted());

    let c = counters.clone();
    session
        .mount(Some(&(800u32, 600u32)), move |_| Ok(MockBackend::new(c)))
        .expect("retry");
    assert!(session.is_mounted());
}

#[test]
fn partial_mount_failure_rolls_back_created_resources() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut session = SceneSession::new();
    let c = counters.clone();
    let err = session
        .mount(Some(&(800u32, 600u32)), move |_| Ok(MockBackend::failing_on(c, 5)))
        .unwrap_err();
    assert!(matches!(err, SceneError::Backend(_)));
    assert!(!session.is_mounted());
    let c = counters.borrow();
    assert!(c.live.is_empty());
    assert_eq!(c.released, 4);
    assert_eq!(c.detached, 1);
}

#[test]
fn mounting_twice_is_rejected() {
    let (mut session, counters) = mounted_session((800, 600));
    let c = counters.clone();
    let err = session
        .mount(Some(&(800u32, 600u32)), move |_| Ok(MockBackend::new(c)))
        .unwrap_err();
    assert_eq!(err, SceneError::AlreadyMounted);
    assert!(session.is_mounted());
}

#[test]
fn resize_is_idempotent_for_identical_dimensions() {
    let (mut session, counters) = mounted_session((800, 600));
    assert_eq!(
        session.resize(&(1024u32, 768u32)),
        ResizeOutcome::Resized(Viewport { width: 1024, height: 768 })
    );
    let aspect = session.camera().map(|c| c.aspect);
    assert_eq!(session.resize(&(1024u32, 768u32)), ResizeOutcome::Unchanged);
    assert_eq!(session.camera().map(|c| c.aspect), aspect);
    assert_eq!(counters.borrow().resizes.len(), 1);
    let aspect = aspect.expect("mounted");
    assert!((aspect - 1024.0 / 768.0).abs() < 1e-6);
}

#[test]
fn resize_ignores_detached_container() {
    let (mut session, counters) = mounted_session((800, 600));
    assert_eq!(session.resize(&DetachedContainer), ResizeOutcome::Ignored);
    assert_eq!(session.resize(&(0u32, 0u32)), ResizeOutcome::Ignored);
    assert!(counters.borrow().resizes.is_empty());
    assert_eq!(session.viewport(), Some(Viewport { width: 800, height: 600 }));
}

#[test]
fn resize_recenters_camera_on_focal_point() {
    let (mut session, _counters) = mounted_session((800, 600));
    let eye = session.camera().expect("mounted").eye;
    session.resize(&(400u32, 900u32));
    let camera = session.camera().expect("mounted");
    assert_eq!(camera.target, CAMERA_FOCAL_POINT);
    assert_eq!(camera.eye, eye);
}

#[test]
fn mount_creates_figure_heart_and_particle_resources() {
    let (session, counters) = mounted_session((800, 600));
    // Two figure materials, one geometry per part, heart geometry and
    // material, particle buffer.
    let expected = FigureId::ALL.len() * (1 + FigurePart::ALL.len()) + 2 + 1;
    assert_eq!(session.live_resources(), expected);
    assert_eq!(counters.borrow().live.len(), expected);
}

#[test]
fn registry_releases_everything_once() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let mut backend = MockBackend::new(counters.clone());
    let mut registry = ResourceRegistry::new();
    let material = registry
        .material(&mut backend, "m", &Material::solid([1.0, 0.0, 0.0]))
        .expect("material");
    let buffer = registry
        .particle_buffer(&mut backend, "p", PARTICLE_COUNT)
        .expect("buffer");
    assert_eq!(registry.count(ResourceKind::Material), 1);
    assert_eq!(registry.count(ResourceKind::ParticleBuffer), 1);
    assert!(registry.contains(material) && registry.contains(buffer));

    assert_eq!(registry.release_all(&mut backend), 2);
    assert_eq!(registry.release_all(&mut backend), 0);
    assert_eq!(registry.live(), 0);
    let c = counters.borrow();
    assert!(c.live.is_empty());
    assert_eq!(c.double_frees, 0);
}

#[test]
fn clock_counts_frames_and_time() {
    let mut clock = SimulationClock::new();
    for _ in 0..3 {
        clock.advance(Duration::from_millis(250));
    }
    assert_eq!(clock.frame(), 3);
    assert_eq!(clock.elapsed(), Duration::from_millis(750));
    assert_eq!(clock.delta(), Duration::from_millis(250));
    assert!((clock.elapsed_secs() - 0.75).abs() < 1e-6);
}
