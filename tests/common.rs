use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

pub fn benchview() -> Command {
    cargo_bin_cmd!("benchview")
}

/// Write the standard fixture: one test set, three models.
///
/// Ground truth: q1=A q2=B q3=D q4=D.
/// - GPT-4o:            A B D C  -> 3/4
/// - Claude-3.5-Sonnet: A B A C  -> 2/4
/// - GPT-4o-Mini:       A C A C  -> 1/4
///
/// Question 3: two models wrong, both chose A. Question 4: all three wrong,
/// all chose C.
#[allow(dead_code)]
pub fn write_fixture(dir: &Path) {
    fs::write(
        dir.join("testset_CPA-2023.csv"),
        "\
Question,Subject,Year,Session,law,Answer
1,Tax,2023,1,O,A
2,Tax,2023,1,X,B
3,Audit,2023,1,X,D
4,Audit,2023,1,O,D
",
    )
    .unwrap();

    fs::write(
        dir.join("GPT-4o_detailed_cot_CPA-2023.csv"),
        "\
Question,predicted_answer,correct_answer,input_tokens,output_tokens,response_time_seconds
1,A,A,1000,200,1.5
2,B,B,1100,210,2.0
3,D,D,1200,220,2.5
4,C,D,1300,230,3.0
",
    )
    .unwrap();

    fs::write(
        dir.join("Claude-3-5-Sonnet_detailed_cot_CPA-2023.csv"),
        "\
Question,predicted_answer,correct_answer
1,A,A
2,B,B
3,A,D
4,C,D
",
    )
    .unwrap();

    fs::write(
        dir.join("GPT-4o-Mini_detailed_cot_CPA-2023.csv"),
        "\
Question,predicted_answer,correct_answer
1,A,A
2,C,B
3,A,D
4,C,D
",
    )
    .unwrap();
}
