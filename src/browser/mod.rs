pub mod locator;
pub mod page;
pub mod protocol;
pub mod session;

pub use locator::{LocatorStrategy, StrategyChain};
pub use page::{Browser, BrowserContext, BrowserLauncher, LaunchOptions, Page, Viewport};
pub use session::NodeLauncher;
