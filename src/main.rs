fn main() {
    drift_bracket_lib::run()
}
