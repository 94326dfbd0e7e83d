fn main() {
    aim_gallery::game::run();
}
