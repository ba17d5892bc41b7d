pub mod coord_readout;
pub mod detail_panel;
pub mod header;
pub mod map_view;
