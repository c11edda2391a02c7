//! Basic example of using the combo engine

use combo_core::{parse_roster, ChainSearch, RankConfig, Ranker, SearchStats, Team};

const ROSTER: &str = "\
蜀,Liu Bei,名将,Rally,Guard,Stun,Rally
蜀,Guan Yu,,Stun,,Rally,Stun
蜀,Zhang Fei,,Stun,Burn,Guard,Burn
蜀,Zhao Yun,,Guard,,Burn,Guard
魏,Cao Cao,名将,Burn,Stun,Guard,Stun
魏,Xiahou Dun,,Stun,,Stun,終了
呉,Zhou Yu,,Burn,Burn,Stun,Burn
";

fn main() {
    let roster = parse_roster(ROSTER);
    println!("Loaded {} characters\n", roster.len());

    // Search a single team
    let team = Team::new(roster[..4].to_vec()).expect("first four are distinct");
    let sequences = ChainSearch::new().search(&team);
    println!("Team {} produces {} combos:", team, sequences.len());
    for (i, seq) in sequences.iter().enumerate() {
        println!("{:>3}. {}", i + 1, seq);
    }

    let stats = SearchStats::from_sequences(&sequences);
    println!(
        "\nBy length: 1={} 2={} 3={} 4={}\n",
        stats.bucket(1),
        stats.bucket(2),
        stats.bucket(3),
        stats.bucket(4)
    );

    // Rank every team that includes Cao Cao
    let ranker = Ranker::new(RankConfig::default().with_top_n(3));
    let boards = ranker
        .rank(&roster, &["Cao Cao".to_string()], false)
        .expect("Cao Cao is in the roster");
    println!("Best teams with Cao Cao:");
    for result in &boards.top {
        println!(
            "  #{:<3} {:<40} total={} four-chains={}",
            result.team_no,
            result.team.to_string(),
            result.stats.total,
            result.stats.bucket(4)
        );
    }
}
