pub mod estimation;
pub mod features;
pub mod plant;
pub mod report;
pub mod sensor;
pub mod soil;
pub mod suggestion;

pub use estimation::*;
pub use features::*;
pub use plant::*;
pub use report::*;
pub use sensor::*;
pub use soil::*;
pub use suggestion::*;
