// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function dispatches to focused handler methods.

use crate::app::state::{AppModel, CameraAccess, Message};
use crate::backends::camera::CameraFrame;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    /// Route messages to their handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            Message::CameraAccess(access) => self.handle_camera_access(access),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::SelectFilter(filter) => self.handle_select_filter(filter),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }

    fn handle_camera_access(&mut self, access: CameraAccess) -> Task<cosmic::Action<Message>> {
        match access {
            CameraAccess::Granted => info!("Camera access granted, starting capture"),
            CameraAccess::Denied => warn!("Camera access denied"),
            CameraAccess::Unknown => {}
        }
        // The camera subscription is keyed on this state; granting access
        // restarts the subscription and brings the pipeline up.
        self.camera_access = access;
        Task::none()
    }

    fn handle_camera_frame(&mut self, frame: Arc<CameraFrame>) -> Task<cosmic::Action<Message>> {
        // Frames can linger in the channel across a permission change. Ignore
        // anything that arrives while capture is not allowed.
        if !self.camera_access.allows_capture() {
            debug!("Dropping frame received without camera access");
            return Task::none();
        }

        self.frames_received += 1;
        if self.frames_received == 1 {
            info!(
                width = frame.width,
                height = frame.height,
                "First frame received"
            );
        }
        self.current_frame = Some(frame);
        Task::none()
    }

    fn handle_select_filter(
        &mut self,
        filter: crate::app::FilterKind,
    ) -> Task<cosmic::Action<Message>> {
        debug!(?filter, "Filter selected");
        self.selected_filter = filter;

        self.config.last_filter = filter;
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save filter selection");
        }
        Task::none()
    }

    fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(
            mirror_preview = self.config.mirror_preview,
            "Mirror preview toggled"
        );

        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save mirror preview setting");
        }
        Task::none()
    }

    fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        self.selected_filter = config.last_filter;
        self.config = config;
        cosmic::command::set_theme(self.config.app_theme.theme())
    }
}
