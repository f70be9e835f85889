fn main() {
    let command_line_interface = cw_typegen::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
