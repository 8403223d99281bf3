// ABOUTME: Hands a resolved service URL to the operating system
// ABOUTME: The opener is a trait so commands can be exercised without launching a browser

use std::io;

/// Something that can open a URL (browser, OS handler, test recorder)
pub trait UrlOpener {
    fn open_url(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> io::Result<()> {
        log::info!("Opening {}", url);
        open::that(url)
    }
}
