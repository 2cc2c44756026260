//! Binary entrypoint for fontfav (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontfav_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
