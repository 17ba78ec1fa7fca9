fn main() -> ontosim::Result<()> {
    ontosim::cli::main()
}
