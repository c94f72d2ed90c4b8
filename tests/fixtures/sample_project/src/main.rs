fn main() {
    println!("{}", sample::greeting());
}
