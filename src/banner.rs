// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
    _         _        _____            _
   / \  _   _| |_ ___ | ____|_   ____ _| |
  / _ \| | | | __/ _ \|  _| \ \ / / _` | |
 / ___ \ |_| | || (_) | |___ \ V / (_| | |
/_/   \_\__,_|\__\___/|_____| \_/ \__,_|_|

    Intelligent Answer Assessment
"#;
    println!("{}", banner);
}
