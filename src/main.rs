fn main() {
    env_logger::init();

    let app = gestureglobe::default();
    app.run();
}
