use proptest::prelude::*;
use zitems_domain::verdict::{Decision, Verdict};
use zitems_resolution::combine;

fn verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        Just(Verdict::allow()),
        Just(Verdict::abstain()),
        "[a-z ]{0,12}".prop_map(|reason: String| Verdict::deny(reason)),
    ]
}

fn decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Allow), Just(Decision::Deny)]
}

proptest! {
    #[test]
    fn any_deny_wins(mut verdicts in prop::collection::vec(verdict(), 0..8), reason in "[a-z]{1,8}", at in any::<prop::sample::Index>(), default in decision()) {
        let position = at.index(verdicts.len() + 1);
        verdicts.insert(position, Verdict::deny(reason));
        prop_assert_eq!(combine(&verdicts, default), Decision::Deny);
    }

    #[test]
    fn order_does_not_matter(verdicts in prop::collection::vec(verdict(), 0..8), default in decision()) {
        let mut reversed = verdicts.clone();
        reversed.reverse();
        let mut rotated = verdicts.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        let expected = combine(&verdicts, default);
        prop_assert_eq!(combine(&reversed, default), expected);
        prop_assert_eq!(combine(&rotated, default), expected);
    }

    #[test]
    fn all_abstain_is_the_default(count in 0usize..8, default in decision()) {
        let verdicts = vec![Verdict::abstain(); count];
        prop_assert_eq!(combine(&verdicts, default), default);
    }
}
