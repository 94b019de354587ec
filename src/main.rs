fn main() -> std::process::ExitCode {
    showhide_desktop::main()
}
