pub mod filter_bar;
pub mod pair_menu;
pub mod progress_bar;
pub mod verb_card;
