mod local_holding_area;

pub use local_holding_area::LocalHoldingArea;
