pub mod charts;
pub mod explorer;
pub mod home;
pub mod insights;
pub mod nav;
pub mod visuals;
