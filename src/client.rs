pub mod cricbuzz;
