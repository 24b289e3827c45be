// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Periodic viewport persistence.
//!
//! While an editor is mounted, its current view is pushed to the store on a
//! fixed period. The loop holds only a `Weak` to the editor's view and
//! re-checks on every tick that the view is still alive and that the app is
//! still on the map it was started for. Either check failing ends the task,
//! so it never writes after unmount or after the user has moved elsewhere.

use crate::data::AppContext;
use crate::model::view::read_view;
use crate::model::{MapId, View};
use crate::settings;
use crate::sync::FeatureStore;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Why the autosave loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveStop {
    /// The editor's view was dropped
    Unmounted,
    /// The app navigated to a different map
    Navigated,
}

/// Everything the loop needs, captured at mount
pub struct Autosave {
    pub map_id: MapId,
    pub view: Weak<RwLock<View>>,
    pub context: AppContext,
    pub store: Arc<dyn FeatureStore>,
    pub period: Duration,
}

impl Autosave {
    /// Start the loop on the current runtime
    pub fn spawn(self) -> JoinHandle<AutosaveStop> {
        tokio::spawn(self.run())
    }

    /// Tick until unmounted or navigated away.
    ///
    /// The first write happens one full period after start.
    /// A zero period falls back to the default interval.
    pub async fn run(self) -> AutosaveStop {
        let period = if self.period.is_zero() {
            tracing::warn!("Autosave period is zero, using {:?}", settings::autosave::INTERVAL);
            settings::autosave::INTERVAL
        } else {
            self.period
        };
        tracing::info!("Autosave started for map {} every {period:?}", self.map_id);

        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;

            let current = match self.check() {
                Ok(view) => view,
                Err(reason) => {
                    tracing::info!("Autosave for map {} stopped: {reason:?}", self.map_id);
                    return reason;
                }
            };

            tracing::debug!(map = %self.map_id, zoom = current.zoom, "autosave tick");
            if let Err(err) = self.store.update_map_view(self.map_id, current).await {
                tracing::warn!("Failed to save view for map {}: {err}", self.map_id);
            }
        }
    }

    /// Latest view, or the reason to stop
    fn check(&self) -> Result<View, AutosaveStop> {
        let Some(view) = self.view.upgrade() else {
            return Err(AutosaveStop::Unmounted);
        };
        if self.context.map_id() != Some(self.map_id) {
            return Err(AutosaveStop::Navigated);
        }
        let current = *read_view(&view);
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AppPatch;
    use crate::model::{Point, ViewHandle};
    use crate::sync::{MemoryStore, StoreCall, StoreOp};

    const PERIOD: Duration = Duration::from_secs(10);

    fn autosave(store: &MemoryStore, handle: &ViewHandle, ctx: &AppContext) -> Autosave {
        Autosave {
            map_id: MapId(1),
            view: handle.downgrade(),
            context: ctx.clone(),
            store: Arc::new(store.clone()),
            period: PERIOD,
        }
    }

    fn mounted_context() -> AppContext {
        let ctx = AppContext::default();
        ctx.set(AppPatch::map(MapId(1)));
        ctx
    }

    #[tokio::test(start_paused = true)]
    async fn pushes_latest_view_each_period() {
        let store = MemoryStore::new();
        let ctx = mounted_context();
        let handle = ViewHandle::new(View::default());
        let task = autosave(&store, &handle, &ctx).spawn();

        tokio::time::sleep(PERIOD / 2).await;
        assert!(store.calls().is_empty());

        let moved = View::new(Point::new(40.0, -3.0), 12.0);
        handle.set(moved);
        tokio::time::sleep(PERIOD).await;

        assert_eq!(
            store.calls_of(StoreOp::UpdateView),
            vec![StoreCall::UpdateView(MapId(1), moved)]
        );
        assert_eq!(store.map_view(MapId(1)), Some(moved));

        drop(handle);
        assert_eq!(task.await.unwrap(), AutosaveStop::Unmounted);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_map_changes() {
        let store = MemoryStore::new();
        let ctx = mounted_context();
        let handle = ViewHandle::new(View::default());
        let task = autosave(&store, &handle, &ctx).spawn();

        tokio::time::sleep(PERIOD + PERIOD / 2).await;
        assert_eq!(store.calls_of(StoreOp::UpdateView).len(), 1);

        ctx.set(AppPatch::map(MapId(2)));
        assert_eq!(task.await.unwrap(), AutosaveStop::Navigated);
        assert_eq!(store.calls_of(StoreOp::UpdateView).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn never_writes_after_unmount() {
        let store = MemoryStore::new();
        let ctx = mounted_context();
        let handle = ViewHandle::new(View::default());
        let task = autosave(&store, &handle, &ctx).spawn();

        drop(handle);
        assert_eq!(task.await.unwrap(), AutosaveStop::Unmounted);
        assert!(store.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_uses_default_interval() {
        let store = MemoryStore::new();
        let ctx = mounted_context();
        let handle = ViewHandle::new(View::default());
        let mut saver = autosave(&store, &handle, &ctx);
        saver.period = Duration::ZERO;
        let _task = saver.spawn();

        tokio::time::sleep(settings::autosave::INTERVAL / 2).await;
        assert!(store.calls().is_empty());
        tokio::time::sleep(settings::autosave::INTERVAL).await;
        assert_eq!(store.calls_of(StoreOp::UpdateView).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn store_errors_do_not_stop_the_loop() {
        let store = MemoryStore::new();
        store.fail(StoreOp::UpdateView);
        let ctx = mounted_context();
        let handle = ViewHandle::new(View::default());
        let _task = autosave(&store, &handle, &ctx).spawn();

        tokio::time::sleep(PERIOD * 3 + PERIOD / 2).await;
        assert_eq!(store.calls_of(StoreOp::UpdateView).len(), 3);
    }
}
