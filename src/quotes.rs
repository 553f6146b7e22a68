use rand::seq::IndexedRandom;

pub const QUOTES: &[&str] = &[
    "The only truly secure system is one that is powered off, cast in a block of concrete and sealed in a lead-lined room. - Gene Spafford",
    "Talk is cheap. Show me the code. - Linus Torvalds",
    "The best way to predict the future is to invent it. - Alan Kay",
    "Hackers are breaking systems for profit. Meanwhile, they're stealing our identity and selling our data. - Tim Cook",
    "Code is like humor. When you have to explain it, it's bad. - Cory House",
    "First, solve the problem. Then, write the code. - John Johnson",
    "Any fool can write code that a computer can understand. Good programmers write code that humans can understand. - Martin Fowler",
    "The computer was born to solve problems that did not exist before. - Bill Gates",
    "To err is human, but to really foul things up you need a computer. - Paul Ehrlich",
    "It's hardware that makes a machine fast. It's software that makes a fast machine slow. - Craig Bruce",
    "Privacy is not an option, and it shouldn't be the price we accept for just getting on the Internet. - Gary Kovacs",
    "Cybersecurity is much more than a matter of IT. - Stephane Nappo",
];

pub fn random_quote() -> &'static str {
    QUOTES.choose(&mut rand::rng()).copied().unwrap_or(QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_the_list() {
        for _ in 0..20 {
            assert!(QUOTES.contains(&random_quote()));
        }
    }
}
