// SPDX-License-Identifier: GPL-3.0-only

//! Main application module
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, FilterKind)
//! - `update`: Message handling
//! - `view`: Main view rendering
//! - `filter_bar`: Filter selection buttons
//! - `video_widget`: Camera preview display widget
//! - `video_primitive`: GPU rendering primitive behind the widget

mod filter_bar;
mod state;
mod update;
mod video_primitive;
mod video_widget;
mod view;

use crate::backends::camera::{CameraPipeline, portal};
use crate::config::Config;
use crate::constants::pipeline;
use crate::errors::CameraError;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget;
use cosmic::{Element, Task};
pub use state::{AppModel, CameraAccess, FilterKind, Message};
use tracing::{error, info};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.filtercam";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let selected_filter = config.last_filter;
        let app = AppModel {
            core,
            config,
            config_handler,
            camera_access: CameraAccess::Unknown,
            selected_filter,
            current_frame: None,
            frames_received: 0,
        };

        // Ask the portal for camera access before any capture starts
        let portal_task = Task::perform(
            async {
                match portal::request_access().await {
                    Ok(()) => CameraAccess::Granted,
                    Err(CameraError::AccessDenied) => CameraAccess::Denied,
                    Err(e) => {
                        error!(error = %e, "Camera portal request failed");
                        CameraAccess::Denied
                    }
                }
            },
            |access| cosmic::Action::App(Message::CameraAccess(access)),
        );

        (app, portal_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("object-flip-horizontal-symbolic"))
                .on_press(Message::ToggleMirrorPreview)
                .into(),
        ]
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        AppModel::update(self, message)
    }

    fn view(&self) -> Element<'_, Self::Message> {
        AppModel::view(self)
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::StreamExt;
        use std::sync::Arc;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // The capture subscription only exists once access is granted; the id
        // includes the access state so granting access restarts it.
        if !self.camera_access.allows_capture() {
            return config_sub;
        }

        let camera_sub = Subscription::run_with_id(
            ("camera", self.camera_access),
            cosmic::iced::stream::channel(100, move |mut output| async move {
                info!("Camera subscription started");

                loop {
                    if output.is_closed() {
                        break;
                    }

                    let (sender, mut receiver) = cosmic::iced::futures::channel::mpsc::channel(
                        pipeline::FRAME_CHANNEL_CAPACITY,
                    );

                    let pipeline_opt = match CameraPipeline::new(sender) {
                        Ok(pipeline) => Some(pipeline),
                        Err(e) => {
                            error!(error = %e, "Failed to initialize capture pipeline");
                            None
                        }
                    };

                    if let Some(pipeline) = pipeline_opt {
                        loop {
                            if output.is_closed() {
                                info!("Output channel closed, stopping capture");
                                break;
                            }

                            // Poll with a timeout so a stalled camera still
                            // lets the closed-channel check run.
                            let next = tokio::time::timeout(
                                crate::constants::timing::FRAME_POLL_TIMEOUT,
                                receiver.next(),
                            )
                            .await;

                            match next {
                                Err(_) => continue,
                                Ok(Some(frame)) => {
                                    // Non-blocking send; drop the frame when
                                    // the UI is busy, a newer one follows.
                                    if let Err(e) =
                                        output.try_send(Message::CameraFrame(Arc::new(frame)))
                                        && e.is_disconnected()
                                    {
                                        info!("UI channel disconnected, stopping capture");
                                        break;
                                    }
                                }
                                Ok(None) => {
                                    info!("Frame stream ended");
                                    break;
                                }
                            }
                        }
                        drop(pipeline);
                        if output.is_closed() {
                            break;
                        }
                    } else {
                        tokio::time::sleep(tokio::time::Duration::from_secs(
                            pipeline::RETRY_DELAY_SECS,
                        ))
                        .await;
                    }
                }
            }),
        );

        Subscription::batch([config_sub, camera_sub])
    }
}
