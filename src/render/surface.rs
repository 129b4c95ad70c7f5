use crate::animation::FrameParams;
use crate::config::ViewportConfig;
use crate::render::markup;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, Viewport as ClipViewport,
};
use chromiumoxide::handler::viewport::Viewport as EmulatedViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use itertools::Itertools;
use serde::Deserialize;
use tokio::task::JoinHandle;

/// Errors raised by the headless rendering surface. All of them are fatal
/// to the generation run; there is no retry.
#[derive(thiserror::Error, Debug)]
pub(crate) enum SurfaceError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("element '{0}' not found in badge document")]
    ElementNotFound(String),

    #[error("unexpected evaluation result: {0}")]
    Evaluate(String),

    #[error("invalid capture clip: {0}")]
    Clip(String),

    #[error("devtools call failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// Rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Rect {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Rect {
    /// Expand by `padding` on every side.
    pub(crate) fn padded(&self, padding: f64) -> Rect {
        Rect {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }

    /// Snap to whole-pixel bounds, growing outward. Captures taken from an
    /// integer-aligned clip have exact, predictable pixel dimensions.
    pub(crate) fn round_out(&self) -> Rect {
        let left = self.x.floor();
        let top = self.y.floor();
        Rect {
            x: left,
            y: top,
            width: (self.x + self.width).ceil() - left,
            height: (self.y + self.height).ceil() - top,
        }
    }
}

/// An exclusive headless Chromium page the badge document is rendered on.
///
/// One surface serves one variant: style state is mutated in place before
/// every capture, so the frame loop must stay strictly sequential.
pub(crate) struct Surface {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Surface {
    /// Spawn a headless browser with the given viewport geometry.
    pub(crate) async fn launch(viewport: &ViewportConfig) -> Result<Self, SurfaceError> {
        let config = BrowserConfig::builder()
            .window_size(viewport.width, viewport.height)
            .viewport(EmulatedViewport {
                width: viewport.width,
                height: viewport.height,
                device_scale_factor: Some(viewport.scale_factor),
                ..Default::default()
            })
            .build()
            .map_err(SurfaceError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| SurfaceError::Launch(err.to_string()))?;

        // Drive CDP events until the browser connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        Ok(Self { browser, page, handler_task })
    }

    /// Load the badge document and wait until the badge element exists.
    pub(crate) async fn load(&self, html: &str) -> Result<(), SurfaceError> {
        self.page.set_content(html).await?;
        self.page
            .find_element(markup::BADGE_SELECTOR)
            .await
            .map_err(|_| SurfaceError::ElementNotFound(markup::BADGE_SELECTOR.into()))?;
        Ok(())
    }

    /// Bounding rectangle of `selector` in viewport coordinates.
    pub(crate) async fn locate(&self, selector: &str) -> Result<Rect, SurfaceError> {
        let expression = format!(
            "JSON.stringify((() => {{ \
                const el = document.querySelector('{selector}'); \
                if (!el) return null; \
                const r = el.getBoundingClientRect(); \
                return {{ x: r.x, y: r.y, width: r.width, height: r.height }}; \
            }})())"
        );
        let payload: String = self
            .page
            .evaluate(expression)
            .await?
            .into_value()
            .map_err(|err| SurfaceError::Evaluate(err.to_string()))?;
        let rect: Option<Rect> = serde_json::from_str(&payload)
            .map_err(|err| SurfaceError::Evaluate(err.to_string()))?;
        rect.ok_or_else(|| SurfaceError::ElementNotFound(selector.to_string()))
    }

    /// Apply one frame's custom-property set to the badge document.
    pub(crate) async fn apply(&self, params: &FrameParams) -> Result<(), SurfaceError> {
        let assignments = params
            .style_properties()
            .iter()
            .map(|(name, value)| format!("s.setProperty('{name}', '{value}')"))
            .join("; ");
        let expression = format!(
            "(() => {{ const s = document.querySelector('{root}').style; {assignments}; }})()",
            root = markup::STYLE_ROOT_SELECTOR,
        );
        self.page.evaluate(expression).await?;
        Ok(())
    }

    /// Capture the clip rectangle as PNG bytes.
    pub(crate) async fn capture(&self, clip: &Rect) -> Result<Vec<u8>, SurfaceError> {
        let clip = ClipViewport::builder()
            .x(clip.x)
            .y(clip.y)
            .width(clip.width)
            .height(clip.height)
            .scale(1.0)
            .build()
            .map_err(SurfaceError::Clip)?;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(clip)
            .build();
        Ok(self.page.screenshot(params).await?)
    }

    /// Release the surface. The browser process is shut down before the
    /// next variant starts.
    pub(crate) async fn close(mut self) -> Result<(), SurfaceError> {
        self.browser.close().await?;
        // Reap the child; a process that already vanished is fine here.
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}
