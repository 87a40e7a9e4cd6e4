fn main() -> std::process::ExitCode {
    medel_lib::run()
}
