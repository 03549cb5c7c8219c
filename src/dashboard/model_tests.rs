use egui::{Vec2, pos2};

use super::*;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        // High bits of an LCG are much better distributed than the low ones.
        ((self.next_u64() >> 33) as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() >> 63) != 0
    }

    fn next_f32(&mut self, upper: f32) -> f32 {
        (self.next_usize(10_000) as f32 / 10_000.0) * upper
    }

    fn pick_collection(&mut self) -> Collection {
        Collection::ALL[self.next_usize(Collection::ALL.len())]
    }
}

fn options() -> DashboardOptions {
    DashboardOptions {
        debug_event_log: true,
        debug_event_log_capacity: 64,
        debug_integrity: true,
        debug_integrity_panic: true,
        ..Default::default()
    }
}

fn new_surface(widgets: usize, icons: usize) -> MemorySurface {
    let mut surface = MemorySurface::new();
    surface.set_placement(
        Collection::Widgets,
        ItemPlacement::Grid {
            origin: pos2(0.0, 0.0),
            columns: 3,
            cell: Vec2::new(120.0, 80.0),
            gap: Vec2::splat(10.0),
        },
    );
    surface.set_placement(
        Collection::Icons,
        ItemPlacement::row(pos2(0.0, 900.0), Vec2::splat(32.0), 4.0),
    );
    for i in 0..widgets {
        surface.push(Collection::Widgets, format!("w{i}"), ());
    }
    for i in 0..icons {
        surface.push(Collection::Icons, format!("i{i}"), ());
    }
    surface
}

fn random_live_item(rng: &mut Rng, surface: &MemorySurface, collection: Collection) -> Option<ItemId> {
    let items = surface.items(collection);
    if items.is_empty() {
        return None;
    }
    Some(items[rng.next_usize(items.len())].id.clone())
}

fn sorted_ids(surface: &MemorySurface, collection: Collection) -> Vec<ItemId> {
    let mut ids = surface.item_ids(collection);
    ids.sort();
    ids
}

fn assert_model_ok(dashboard: &Dashboard<&mut MemoryStore>, surface: &MemorySurface, step: usize) {
    for collection in Collection::ALL {
        let dragged = dashboard.dragged(collection);

        if let Some(dragged) = dragged {
            assert!(
                dashboard.customize_mode(),
                "step {step}: {collection} drag {dragged} outside customize mode"
            );
            assert!(
                !dashboard.is_pinned(collection, dragged.as_str()),
                "step {step}: pinned {collection} item {dragged} is being dragged"
            );
        }

        for item in surface.items(collection) {
            if item.dragging {
                assert_eq!(
                    Some(&item.id),
                    dragged,
                    "step {step}: stale dragging flag on {collection} item {}",
                    item.id
                );
            }
        }

        if dragged.is_none() {
            assert!(
                !surface.drop_indicator(collection),
                "step {step}: {collection} drop indicator left on"
            );
        }
    }

    assert_eq!(surface.customize_visual(), dashboard.customize_mode(), "step {step}");

    // Every state change is written through.
    let store: &MemoryStore = dashboard.store();
    if store.get(WIDGETS_STORAGE_KEY).unwrap().is_some() {
        let saved = LayoutStore::<LayoutRecord>::new(WIDGETS_STORAGE_KEY).load(store, &[]);
        assert_eq!(saved, dashboard.state().widgets, "step {step}");
    }
    if store.get(ICONS_STORAGE_KEY).unwrap().is_some() {
        let saved = LayoutStore::<IconsRecord>::new(ICONS_STORAGE_KEY).load(store, &[]);
        assert_eq!(saved, dashboard.state().icons, "step {step}");
    }
}

fn run_model(seed: u64, steps: usize) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Rng::new(seed);
    let mut store = MemoryStore::new();
    let mut surface = new_surface(2 + rng.next_usize(6), 1 + rng.next_usize(5));
    let mut dashboard = Dashboard::load(&mut store, &mut surface, options());
    let mut next_item = 100usize;

    for step in 0..steps {
        let collection = rng.pick_collection();
        let live_before = sorted_ids(&surface, collection);
        let mut host_changed_items = false;

        match rng.next_usize(20) {
            0..=1 => {
                let enabled = rng.next_bool() || !dashboard.customize_mode();
                dashboard.set_customize_mode(&mut surface, enabled);
                assert_eq!(dashboard.customize_mode(), enabled);
            }
            2..=3 => {
                if let Some(id) = random_live_item(&mut rng, &surface, collection) {
                    let was_pinned = dashboard.is_pinned(collection, id.as_str());
                    let pinned = dashboard.toggle_pin(&mut surface, collection, &id);
                    assert_eq!(pinned, Some(!was_pinned), "step {step}");
                }
            }
            4..=6 => {
                if let Some(id) = random_live_item(&mut rng, &surface, collection) {
                    let result = dashboard.drag_start(&mut surface, collection, &id);
                    let pinned = dashboard.is_pinned(collection, id.as_str());
                    if result.is_started() {
                        assert!(!pinned, "step {step}: pinned item {id} started a drag");
                        assert_eq!(dashboard.dragged(collection), Some(&id));
                    } else if !dashboard.customize_mode() {
                        assert_eq!(result, DragStart::Refused(DragRefusal::CustomizeOff));
                    }
                }
            }
            7..=11 => {
                let pointer = pos2(rng.next_f32(500.0), rng.next_f32(1000.0));
                let accepted = dashboard.drag_over(&mut surface, collection, pointer);
                assert_eq!(
                    accepted,
                    dashboard.dragged(collection).is_some(),
                    "step {step}"
                );
            }
            12..=13 => {
                let was_dragging = dashboard.dragged(collection).is_some();
                let committed = dashboard.drag_drop(&mut surface, collection);
                assert_eq!(committed, was_dragging, "step {step}");
                if committed {
                    assert_eq!(
                        dashboard.state().order(collection),
                        surface.item_ids(collection).as_slice(),
                        "step {step}: drop must commit the live order"
                    );
                }
            }
            14..=15 => {
                let stored_before = dashboard.store().get(WIDGETS_STORAGE_KEY).unwrap();
                let order_before = dashboard.state().order(collection).to_vec();
                dashboard.drag_end(&mut surface, collection);
                assert_eq!(dashboard.dragged(collection), None);
                assert_eq!(dashboard.state().order(collection), order_before.as_slice());
                assert_eq!(
                    dashboard.store().get(WIDGETS_STORAGE_KEY).unwrap(),
                    stored_before
                );
            }
            16 => {
                let id = ItemId::new(format!("n{next_item}"));
                next_item += 1;
                surface.push(collection, id, ());
                host_changed_items = true;
                dashboard.apply(&mut surface);
            }
            17 => {
                if surface.items(collection).len() > 1 {
                    if let Some(id) = random_live_item(&mut rng, &surface, collection) {
                        surface.remove(collection, &id);
                        host_changed_items = true;
                        dashboard.apply(&mut surface);
                    }
                }
            }
            18 => {
                if rng.next_usize(4) == 0 {
                    dashboard.reset(&mut surface);
                    assert!(!dashboard.customize_mode());
                    for collection in Collection::ALL {
                        assert!(dashboard.state().pins(collection).is_empty());
                        assert_eq!(
                            surface.item_ids(collection),
                            surface.natural_order(collection),
                            "step {step}: reset must restore the authored order"
                        );
                    }
                }
            }
            _ => {
                dashboard.apply(&mut surface);
                let revision = surface.revision();
                dashboard.apply(&mut surface);
                assert_eq!(surface.revision(), revision, "step {step}: apply is not idempotent");
            }
        }

        if !host_changed_items {
            // Layout operations only ever permute the live items.
            assert_eq!(sorted_ids(&surface, collection), live_before, "step {step}");
        }
        assert_model_ok(&dashboard, &surface, step);
    }

    // A fresh page load reads back exactly what was written.
    let state = dashboard.state().clone();
    let widgets_saved = store.get(WIDGETS_STORAGE_KEY).unwrap().is_some();
    let icons_saved = store.get(ICONS_STORAGE_KEY).unwrap().is_some();

    let mut reloaded_surface = new_surface(0, 0);
    for collection in Collection::ALL {
        for id in surface.natural_order(collection) {
            reloaded_surface.push(collection, id, ());
        }
    }
    let reloaded = Dashboard::load(&mut store, &mut reloaded_surface, options());
    if widgets_saved {
        assert_eq!(reloaded.state().widgets, state.widgets, "seed {seed}");
    }
    if icons_saved {
        assert_eq!(reloaded.state().icons, state.icons, "seed {seed}");
    }
}

#[test]
fn random_operation_sequences_keep_the_layout_consistent() {
    for seed in 0..64 {
        run_model(seed, 200);
    }
}

#[test]
fn long_random_session() {
    run_model(0xDA5B_0A2D, 2_000);
}
