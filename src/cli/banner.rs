//! Startup banner for interactive mode.

use owo_colors::{OwoColorize, Stream};

const LOGO: &str = r"
   _____ _                   __ __
  / ___/(_)___ _____  ____ _/ // /_____  ___  ____  ___  _____
  \__ \/ / __ `/ __ \/ __ `/ // //_/ _ \/ _ \/ __ \/ _ \/ ___/
 ___/ / / /_/ / / / / /_/ / // ,< /  __/  __/ /_/ /  __/ /
/____/_/\__, /_/ /_/\__,_/_//_/|_|\___/\___/ .___/\___/_/
       /____/                             /_/";

/// Prints the banner to stdout. Colors only when stdout supports them.
pub fn print_banner() {
    println!(
        "{}",
        LOGO.if_supports_color(Stream::Stdout, |t| t.truecolor(120, 170, 220))
    );
    println!(
        "  {}",
        "Liquidations on Arc, hedges on Polygon."
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
    println!();
}
