//! Standalone model window backed by winit.
//!
//! The same application handler runs natively and in the browser. Natively
//! the GPU is initialised with `pollster` and the model is read on a
//! background thread; in the browser both run as `spawn_local` tasks. Either
//! way their results come back through the event loop proxy as
//! user events, so all state is touched from the event loop only.
//!
//! ```no_run
//! # use modelview::Viewer;
//! Viewer::builder()
//!     .with_model("models/castle/scene.gltf")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    camera::{Camera, OrbitControls},
    command::ViewerCommand,
    controller::InteractionController,
    error::ViewerError,
    frame_loop::{FrameLoop, FrameScheduler},
    gpu::render_context::RenderContext,
    input::{InputEvent, InputProcessor, MouseButton},
    loader::LoadEvent,
    model::Model,
    options::Options,
    renderer::ModelRenderer,
    viewport::Viewport,
};

/// Events delivered to the winit loop from outside the window.
pub(crate) enum ViewerEvent {
    /// A command from the page (the toggle button).
    Command(ViewerCommand),
    /// Progress or outcome of the model load.
    Load(LoadEvent),
    /// The browser finished creating the GPU context.
    #[cfg(target_arch = "wasm32")]
    GpuReady(Box<Result<RenderContext, ViewerError>>),
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            model: None,
            options: None,
            title: "modelview".into(),
        }
    }

    /// Set the model to load: a file path natively, a URL in the browser.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            model: self.model,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that displays one glTF model with orbit controls.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    model: Option<String>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop.
    ///
    /// Natively this blocks until the window is closed. In the browser it
    /// hands the loop to the page and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::<ViewerEvent>::with_user_event()
            .build()
            .map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let app = ViewerApp::new(
            self.model,
            self.options,
            self.title,
            event_loop.create_proxy(),
        );

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop
                .run_app(&mut app)
                .map_err(|e| ViewerError::Viewer(e.to_string()))
        }
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Schedules frames by asking the window for another redraw.
struct WindowScheduler(Arc<Window>);

impl FrameScheduler for WindowScheduler {
    fn schedule_next(&mut self) {
        self.0.request_redraw();
    }
}

/// Surface plus the model pass drawing into it.
struct Gpu {
    context: RenderContext,
    renderer: ModelRenderer,
}

impl Gpu {
    fn new(context: RenderContext, options: &Options) -> Self {
        let renderer = ModelRenderer::new(&context, options);
        Self { context, renderer }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.context.resize(viewport.width(), viewport.height());
        self.renderer.resize(&self.context);
    }

    fn render(&mut self, camera: &Camera) {
        self.renderer.update_camera(&self.context.queue, camera);
        match self.renderer.render(&self.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.context.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    frame_loop: Option<FrameLoop<WindowScheduler>>,
    controller: InteractionController<OrbitControls>,
    camera: Camera,
    viewport: Viewport,
    input: InputProcessor,
    /// A model that finished loading before the GPU was ready.
    pending_model: Option<Model>,
    model: Option<String>,
    options: Options,
    title: String,
    proxy: EventLoopProxy<ViewerEvent>,
}

impl ViewerApp {
    fn new(
        model: Option<String>,
        options: Options,
        title: String,
        proxy: EventLoopProxy<ViewerEvent>,
    ) -> Self {
        let controller = InteractionController::with_settings(
            OrbitControls::from_options(&options.camera),
            options.camera.auto_rotate,
            options.camera.rotate_sensitivity,
        );
        let viewport = Viewport::new(1, 1);
        let mut camera = Camera::from_options(&options.camera, 1.0);
        controller.camera().apply_to(&mut camera);
        Self {
            window: None,
            gpu: None,
            frame_loop: None,
            controller,
            camera,
            viewport,
            input: InputProcessor::with_key_bindings(
                options.keybindings.clone(),
            ),
            pending_model: None,
            model,
            options,
            title,
            proxy,
        }
    }

    fn create_window(
        &self,
        event_loop: &ActiveEventLoop,
    ) -> Result<Arc<Window>, ViewerError> {
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_transparent(self.options.display.transparent_background);

        #[cfg(target_arch = "wasm32")]
        let attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;
            let attrs = attrs.with_append(true);
            match crate::web::page_size() {
                Some((w, h)) => {
                    attrs.with_inner_size(winit::dpi::LogicalSize::new(w, h))
                }
                None => attrs,
            }
        };

        event_loop
            .create_window(attrs)
            .map(Arc::new)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn init_gpu(&mut self, window: &Arc<Window>) -> Result<(), ViewerError> {
        let context = pollster::block_on(RenderContext::new(
            Arc::clone(window),
            (self.viewport.width(), self.viewport.height()),
            self.options.display.transparent_background,
        ))?;
        self.on_gpu_ready(context);
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    #[allow(clippy::unnecessary_wraps)]
    fn init_gpu(&mut self, window: &Arc<Window>) -> Result<(), ViewerError> {
        let window = Arc::clone(window);
        let size = (self.viewport.width(), self.viewport.height());
        let transparent = self.options.display.transparent_background;
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = RenderContext::new(window, size, transparent)
                .await
                .map_err(ViewerError::from);
            let _ = proxy.send_event(ViewerEvent::GpuReady(Box::new(result)));
        });
        Ok(())
    }

    fn on_gpu_ready(&mut self, context: RenderContext) {
        let mut gpu = Gpu::new(context, &self.options);
        gpu.resize(self.viewport);
        if let Some(model) = self.pending_model.take() {
            gpu.renderer.upload_model(&gpu.context, &model);
        }
        self.gpu = Some(gpu);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start_load(&self, source: String) -> Result<(), ViewerError> {
        let proxy = self.proxy.clone();
        let _ = crate::loader::spawn_load(source.into(), move |event| {
            let _ = proxy.send_event(ViewerEvent::Load(event));
        })?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    #[allow(clippy::unnecessary_wraps)]
    fn start_load(&self, source: String) -> Result<(), ViewerError> {
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            crate::loader::load_from_url(&source, &mut |event| {
                let _ = proxy.send_event(ViewerEvent::Load(event));
            })
            .await;
        });
        Ok(())
    }

    fn on_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress(fraction) => {
                log::info!("{:.0}% loaded", fraction * 100.0);
            }
            LoadEvent::Loaded(model) => self.on_model_loaded(model),
            LoadEvent::Failed(e) => log::error!("failed to load model: {e}"),
        }
    }

    fn on_model_loaded(&mut self, model: Model) {
        if let Some(bounds) = model.bounds() {
            self.controller.camera_mut().fit_to_bounds(
                &bounds,
                self.options.camera.fovy,
                self.options.camera.distance,
            );
        }
        match &mut self.gpu {
            Some(gpu) => gpu.renderer.upload_model(&gpu.context, &model),
            None => self.pending_model = Some(model),
        }
    }

    fn dispatch(
        &mut self,
        command: ViewerCommand,
        event_loop: &ActiveEventLoop,
    ) {
        match command {
            ViewerCommand::Quit => self.shutdown(event_loop),
            ViewerCommand::Resize { width, height } => {
                if self.viewport.resize(width, height, &mut self.camera) {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(self.viewport);
                    }
                }
            }
            command => {
                let _ = command.apply(&mut self.controller);
            }
        }
    }

    fn handle_input(
        &mut self,
        event: InputEvent,
        event_loop: &ActiveEventLoop,
    ) {
        if let Some(command) = self.input.handle_event(event) {
            self.dispatch(command, event_loop);
        }
    }

    fn redraw(&mut self) {
        let Self {
            frame_loop,
            controller,
            camera,
            gpu,
            ..
        } = self;
        let Some(frame_loop) = frame_loop else {
            return;
        };
        let _ = frame_loop.run_frame(|| {
            let _ = controller.per_frame_tick();
            controller.camera().apply_to(camera);
            if let Some(gpu) = gpu {
                gpu.render(camera);
            }
        });
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(frame_loop) = &mut self.frame_loop {
            frame_loop.stop();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<ViewerEvent> for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match self.create_window(event_loop) {
            Ok(w) => w,
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let _ = self
            .viewport
            .resize(inner.width, inner.height, &mut self.camera);

        if let Err(e) = self.init_gpu(&window) {
            log::error!("failed to initialise GPU: {e}");
            event_loop.exit();
            return;
        }

        match self.model.take() {
            Some(source) => {
                log::info!("loading {source}");
                if let Err(e) = self.start_load(source) {
                    log::error!("failed to load model: {e}");
                }
            }
            None => log::warn!("no model given, showing an empty scene"),
        }

        #[cfg(all(feature = "web", target_arch = "wasm32"))]
        if self.options.display.show_toggle_button {
            if let Err(e) = crate::web::create_toggle_button(self.proxy.clone())
            {
                log::error!("failed to create toggle button: {e}");
            }
        }

        let mut frame_loop =
            FrameLoop::new(WindowScheduler(Arc::clone(&window)));
        let _ = frame_loop.start();
        self.frame_loop = Some(frame_loop);
        self.window = Some(window);
    }

    fn user_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        event: ViewerEvent,
    ) {
        match event {
            ViewerEvent::Command(command) => self.dispatch(command, event_loop),
            ViewerEvent::Load(load) => self.on_load_event(load),
            #[cfg(target_arch = "wasm32")]
            ViewerEvent::GpuReady(result) => match *result {
                Ok(context) => self.on_gpu_ready(context),
                Err(e) => {
                    log::error!("failed to initialise GPU: {e}");
                    self.shutdown(event_loop);
                }
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => self.dispatch(
                ViewerCommand::Resize {
                    width: size.width,
                    height: size.height,
                },
                event_loop,
            ),

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_input(
                    InputEvent::MouseButton {
                        button: MouseButton::from(button),
                        pressed: state == ElementState::Pressed,
                    },
                    event_loop,
                );
            }

            WindowEvent::CursorMoved { position, .. } => self.handle_input(
                InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                },
                event_loop,
            ),

            WindowEvent::CursorLeft { .. } => self.input.reset_cursor(),

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.handle_input(InputEvent::Scroll { delta }, event_loop);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key = format!("{code:?}");
                if let Some(command) = self.input.handle_key_press(&key) {
                    self.dispatch(command, event_loop);
                }
            }

            _ => (),
        }
    }
}
